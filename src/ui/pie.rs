use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui};

use crate::color::{ACCENT, HIGHLIGHT, PRIMARY, SECONDARY};
use crate::data::aggregate::{Platform, PlatformTotals};

const PIE_SIZE: f32 = 260.0;
/// Largest arc covered by one triangle of a slice.
const SEGMENT: f32 = TAU / 180.0;

fn platform_color(platform: Platform) -> Color32 {
    match platform {
        Platform::Spotify => PRIMARY,
        Platform::Apple => ACCENT,
        Platform::Deezer => SECONDARY,
    }
}

/// `(platform, start angle, sweep)` per non-empty slice, starting at 0 rad
/// and running counter-clockwise.
fn slices(totals: &PlatformTotals) -> Vec<(Platform, f32, f32)> {
    let sum = totals.sum();
    if sum <= 0 {
        return Vec::new();
    }
    let mut start = 0.0;
    totals
        .iter()
        .filter(|&(_, v)| v > 0)
        .map(|(p, v)| {
            let sweep = v as f32 / sum as f32 * TAU;
            let slice = (p, start, sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// Point on the circle; screen y grows downwards, so negate for CCW.
fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    Pos2::new(center.x + radius * angle.cos(), center.y - radius * angle.sin())
}

/// Render the platform pie with percentage labels and a legend.
pub fn platform_pie(ui: &mut Ui, totals: &PlatformTotals) {
    let slices = slices(totals);
    if slices.is_empty() {
        ui.label(RichText::new("No playlist counts for the current selection.").color(ACCENT));
        return;
    }
    let sum = totals.sum() as f32;

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(egui::vec2(PIE_SIZE, PIE_SIZE), Sense::hover());
        let center = response.rect.center();
        let radius = PIE_SIZE / 2.0 - 8.0;

        for &(platform, start, sweep) in &slices {
            let color = platform_color(platform);
            // Fan of thin triangles: each one is convex, the slice may not be.
            let steps = (sweep / SEGMENT).ceil().max(1.0) as usize;
            for k in 0..steps {
                let a0 = start + sweep * k as f32 / steps as f32;
                let a1 = start + sweep * (k + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![center, on_circle(center, radius, a0), on_circle(center, radius, a1)],
                    color,
                    Stroke::NONE,
                ));
            }

            // Deezer shares the panel colour; edges keep its slice visible.
            painter.line_segment(
                [center, on_circle(center, radius, start)],
                Stroke::new(1.0, HIGHLIGHT),
            );

            let pct = sweep / TAU * 100.0;
            painter.text(
                on_circle(center, radius * 0.6, start + sweep / 2.0),
                Align2::CENTER_CENTER,
                format!("{pct:.1}%"),
                FontId::proportional(13.0),
                HIGHLIGHT,
            );
        }

        painter.circle_stroke(center, radius, Stroke::new(1.0, HIGHLIGHT));

        ui.vertical(|ui: &mut Ui| {
            ui.strong("Platforms");
            for (platform, value) in totals.iter() {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(platform_color(platform)));
                    ui.label(format!("{platform}: {value}"));
                    if sum > 0.0 {
                        ui.weak(format!("({:.1}%)", value as f32 / sum * 100.0));
                    }
                });
            }
        });
    });
}
