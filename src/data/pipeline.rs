use serde::Serialize;

use super::aggregate::{
    bpm_values, danceability_energy_pairs, platform_totals, release_trend,
    top_artists_by_streams, ArtistTotal, DanceEnergyPoint, PlatformTotals, ReleaseCount,
};
use super::filter::{filter, FilterParams};
use super::model::{SongTable, Track};
use crate::config::DashboardConfig;

/// Everything the render stage needs for one frame of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    /// Number of rows that passed the filters.
    pub filtered_rows: usize,
    /// First rows of the filtered table.
    pub preview: Vec<Track>,
    /// Computed over the whole table; the sidebar filters do not apply.
    pub top_artists: Vec<ArtistTotal>,
    pub release_trend: Vec<ReleaseCount>,
    pub dance_energy: Vec<DanceEnergyPoint>,
    pub platform_totals: PlatformTotals,
    pub bpm_values: Vec<u32>,
}

impl DashboardViews {
    /// Run filter and all aggregations.  Pure: the same table and params
    /// always give the same views.
    pub fn compute(table: &SongTable, params: &FilterParams, config: &DashboardConfig) -> Self {
        let view = filter(table, params);
        log::debug!(
            "pipeline: {} of {} rows pass years {}..={} / {} artists",
            view.len(),
            table.len(),
            params.year_range.lo(),
            params.year_range.hi(),
            params.artists.len()
        );

        DashboardViews {
            filtered_rows: view.len(),
            preview: view.iter().take(config.preview_rows).cloned().collect(),
            top_artists: top_artists_by_streams(table, config.top_n),
            release_trend: release_trend(&view),
            dance_energy: danceability_energy_pairs(&view),
            platform_totals: platform_totals(&view),
            bpm_values: bpm_values(&view),
        }
    }
}
