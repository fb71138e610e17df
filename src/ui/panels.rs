use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::{ACCENT, PRIMARY};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    // Cheap clone so state can be mutated while listing options.
    let Some(table) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Release year range ----
    ui.strong("Select Release Year Range:");
    if let Some((min, max)) = table.year_bounds {
        let mut lo = state.filters.year_range.lo();
        let mut hi = state.filters.year_range.hi();
        ui.add(egui::Slider::new(&mut lo, min..=max).text("from"));
        ui.add(egui::Slider::new(&mut hi, min..=max).text("to"));
        state.set_year_range(lo, hi);
    } else {
        ui.label(RichText::new("No release years in this dataset.").color(ACCENT));
    }
    ui.separator();

    // ---- Artist multiselect ----
    let n_selected = state.filters.artists.len();
    ui.strong(format!(
        "Select Artist(s):  ({n_selected}/{})",
        table.artist_options.len()
    ));
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.artist_query)
                .hint_text("Search…")
                .desired_width(150.0),
        );
        if ui
            .add_enabled(n_selected > 0, egui::Button::new("Clear").small())
            .clicked()
        {
            state.clear_artists();
        }
    });

    if n_selected == 0 {
        ui.label(RichText::new("All artists").italics().color(ACCENT));
    } else {
        // Selected artists first, click to remove.
        let selected: Vec<String> = state.filters.artists.iter().cloned().collect();
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for artist in &selected {
                let chip = RichText::new(format!("{artist} ✕")).color(PRIMARY);
                if ui.small_button(chip).clicked() {
                    state.toggle_artist(artist);
                }
            }
        });
    }

    let query = state.artist_query.to_lowercase();
    let matches: Vec<&String> = table
        .artist_options
        .iter()
        .filter(|a| query.is_empty() || a.to_lowercase().contains(&query))
        .collect();

    let row_height = ui.spacing().interact_size.y;
    ScrollArea::vertical()
        .auto_shrink([false, true])
        .max_height(ui.available_height())
        .show_rows(ui, row_height, matches.len(), |ui: &mut Ui, rows| {
            for artist in &matches[rows] {
                let mut checked = state.filters.artists.contains(artist.as_str());
                if ui.checkbox(&mut checked, artist.as_str()).changed() {
                    state.toggle_artist(artist);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.views.is_some(), egui::Button::new("Export summary…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(views)) = (&state.dataset, &state.views) {
            ui.label(format!(
                "{} tracks loaded, {} match the filters",
                ds.len(),
                views.filtered_rows
            ));
            if !ds.coercion.is_empty() {
                ui.separator();
                ui.label(RichText::new(format!("{} malformed cells read as 0", ds.coercion.total())).color(ACCENT))
                    .on_hover_text(ds.coercion.to_string());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open song dataset")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard summary")
        .set_file_name("dashboard_summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_views(&path) {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
