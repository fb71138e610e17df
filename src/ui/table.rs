use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Column, Track};

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Cell text for one column of the preview.
fn cell_text(track: &Track, column: Column) -> String {
    match column {
        Column::TrackName => track.track_name.clone(),
        Column::ArtistNames => track.artist_field.clone(),
        Column::ReleasedYear => opt(track.released_year),
        Column::ReleasedMonth => opt(track.released_month),
        Column::Streams => track.streams.to_string(),
        Column::Danceability => opt(track.danceability_pct),
        Column::Energy => opt(track.energy_pct),
        Column::Bpm => opt(track.bpm),
        Column::SpotifyPlaylists => track.in_spotify_playlists.to_string(),
        Column::ApplePlaylists => track.in_apple_playlists.to_string(),
        Column::DeezerPlaylists => track.in_deezer_playlists.to_string(),
    }
}

/// First rows of the filtered table, one column per known header.
pub fn preview_table(ui: &mut Ui, rows: &[Track]) {
    let row_height = ui.text_style_height(&eframe::egui::TextStyle::Body) + 4.0;

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(TableColumn::auto().at_least(140.0))
                .column(TableColumn::auto().at_least(140.0))
                .columns(TableColumn::auto().at_least(60.0), Column::ALL.len() - 2)
                .header(row_height, |mut header| {
                    for col in Column::ALL {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col.header());
                        });
                    }
                })
                .body(|mut body| {
                    for track in rows {
                        body.row(row_height, |mut row| {
                            for col in Column::ALL {
                                row.col(|ui: &mut Ui| {
                                    ui.label(cell_text(track, col));
                                });
                            }
                        });
                    }
                });
        });
}
