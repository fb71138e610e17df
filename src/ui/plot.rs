use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color::{ColorMap, HIGHLIGHT, PRIMARY};
use crate::data::aggregate::{ArtistTotal, DanceEnergyPoint, ReleaseCount};
use crate::state::BpmChart;

const CHART_HEIGHT: f32 = 320.0;

/// Static plot: the dashboard scrolls, so plots must not eat wheel events.
fn chart(id: &str) -> Plot<'static> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

/// Compact stream counts for axis ticks: 1.2B, 340M, 12k.
fn format_count(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.0}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}k", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

// ---------------------------------------------------------------------------
// Top artists (horizontal bar chart)
// ---------------------------------------------------------------------------

pub fn top_artists_chart(ui: &mut Ui, totals: &[ArtistTotal]) {
    let n = totals.len();
    // Largest total at the top.
    let labels: Vec<String> = totals.iter().rev().map(|a| a.artist.clone()).collect();
    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Bar::new((n - 1 - i) as f64, a.streams as f64)
                .name(&a.artist)
                .fill(PRIMARY)
                .width(0.7)
        })
        .collect();

    chart("top_artists")
        .x_axis_label("Total Streams")
        .y_axis_label("Artist")
        .y_axis_min_width(140.0)
        .x_axis_formatter(|mark: GridMark, _range| format_count(mark.value))
        .y_axis_formatter(move |mark: GridMark, _range| {
            let v = mark.value;
            if v.fract() != 0.0 || v < 0.0 {
                return String::new();
            }
            labels.get(v as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(PRIMARY));
        });
}

// ---------------------------------------------------------------------------
// Release trend (line chart)
// ---------------------------------------------------------------------------

/// Months as a fractional year so ticks land on calendar boundaries.
fn date_to_x(date: NaiveDate) -> f64 {
    date.year() as f64 + date.month0() as f64 / 12.0
}

fn x_to_label(x: f64) -> String {
    let year = x.floor();
    let month = ((x - year) * 12.0).round() as u32 % 12 + 1;
    if month == 1 {
        format!("{year:.0}")
    } else {
        format!("{year:.0}-{month:02}")
    }
}

pub fn release_trend_chart(ui: &mut Ui, trend: &[ReleaseCount]) {
    let points: PlotPoints = trend
        .iter()
        .map(|r| [date_to_x(r.date), r.count as f64])
        .collect();

    chart("release_trend")
        .x_axis_label("Release Date")
        .y_axis_label("Number of Songs")
        .x_axis_formatter(|mark: GridMark, _range| x_to_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(PRIMARY).width(2.0).name("Songs"));
        });
}

// ---------------------------------------------------------------------------
// Danceability vs energy (scatter)
// ---------------------------------------------------------------------------

pub fn dance_energy_chart(ui: &mut Ui, pairs: &[DanceEnergyPoint], colors: &ColorMap) {
    // One Points item per colour keeps the plot cheap with many artists.
    let mut groups: HashMap<Color32, Vec<[f64; 2]>> = HashMap::new();
    for p in pairs {
        groups
            .entry(colors.color_for(&p.artist))
            .or_default()
            .push([p.danceability, p.energy]);
    }

    chart("dance_energy")
        .x_axis_label("Danceability (%)")
        .y_axis_label("Energy (%)")
        .include_x(0.0)
        .include_x(100.0)
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            for (color, pts) in groups {
                plot_ui.points(Points::new(pts).color(color).radius(3.0).filled(true));
            }
        });
}

// ---------------------------------------------------------------------------
// BPM distribution (histogram + density)
// ---------------------------------------------------------------------------

pub fn bpm_histogram(ui: &mut Ui, bpm: &BpmChart) {
    let bars: Vec<Bar> = bpm
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{:.0}–{:.0}", b.start, b.end))
        })
        .collect();
    let kde = bpm.kde.clone();

    chart("bpm_histogram")
        .x_axis_label("BPM")
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(PRIMARY));
            if !kde.is_empty() {
                plot_ui.line(Line::new(PlotPoints::from(kde)).color(HIGHLIGHT).width(1.5));
            }
        });
}
