use std::collections::HashMap;

use eframe::egui::{self, Color32};
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

pub const PRIMARY: Color32 = Color32::from_rgb(0x1D, 0xB9, 0x54);
pub const SECONDARY: Color32 = Color32::from_rgb(0x19, 0x14, 0x14);
pub const ACCENT: Color32 = Color32::from_rgb(0x53, 0x53, 0x53);
pub const HIGHLIGHT: Color32 = Color32::WHITE;

/// Dark visuals in the Spotify palette.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = SECONDARY;
    visuals.window_fill = SECONDARY;
    visuals.override_text_color = Some(HIGHLIGHT);
    visuals.selection.bg_fill = PRIMARY;
    visuals.hyperlink_color = PRIMARY;
    ctx.set_visuals(visuals);
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` colours with hues evenly spaced from cyan to magenta.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let (from, to) = (180.0_f32, 300.0_f32);
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let hsl = Hsl::new(from + (to - from) * t, 0.8, 0.6);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: artist → Color32
// ---------------------------------------------------------------------------

/// Maps artist names to distinct colours for the scatter plot.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: HashMap<String, Color32>,
}

impl ColorMap {
    pub fn new(artists: &[String]) -> Self {
        let mapping = artists
            .iter()
            .cloned()
            .zip(generate_palette(artists.len()))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, artist: &str) -> Color32 {
        self.mapping.get(artist).copied().unwrap_or(ACCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_spans_cyan_to_magenta() {
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        // cyan-ish start, magenta-ish end
        assert!(p[0].g() > p[0].r() && p[0].b() > p[0].r());
        assert!(p[2].r() > p[2].g() && p[2].b() > p[2].g());
    }

    #[test]
    fn unknown_artists_get_the_accent_colour() {
        let cm = ColorMap::new(&["A".to_string(), "B".to_string()]);
        assert_ne!(cm.color_for("A"), cm.color_for("B"));
        assert_eq!(cm.color_for("nobody"), ACCENT);
    }
}
