use eframe::egui::{RichText, ScrollArea, Ui};

use crate::color::{ACCENT, PRIMARY};
use crate::state::AppState;
use crate::ui::{pie, plot, table};

/// Render every dashboard section in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(views) = &state.views else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Spotify Most Streamed Songs Dashboard").color(PRIMARY).strong());
            ui.label(
                "Explore trends and insights from the most streamed songs on Spotify, \
                 including artist popularity, release trends, and song characteristics.",
            );
            ui.add_space(8.0);

            section(ui, "Dataset Overview");
            if views.filtered_rows == 0 {
                ui.label(RichText::new("No songs match the current filters.").color(ACCENT));
            }
            table::preview_table(ui, &views.preview);

            section(ui, &format!("Top {} Artists by Total Streams", state.config.top_n));
            plot::top_artists_chart(ui, &views.top_artists);

            section(ui, "Song Release Trends Over Time");
            plot::release_trend_chart(ui, &views.release_trend);

            section(ui, "Danceability vs. Energy");
            plot::dance_energy_chart(ui, &views.dance_energy, &state.color_map);

            section(ui, "Platform Popularity");
            pie::platform_pie(ui, &views.platform_totals);

            section(ui, "Distribution of BPM");
            plot::bpm_histogram(ui, &state.bpm_chart);

            section(ui, "Insights & Summary");
            ui.label(
                "This dashboard reveals interesting insights about song characteristics, \
                 release trends, and artist popularity. Use the filters in the sidebar to explore more!",
            );
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.label(RichText::new(title).size(18.0).strong());
    ui.add_space(4.0);
}
