use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::filter::{FilterParams, YearRange};
use crate::data::histogram::{histogram, kde_curve, HistogramBin};
use crate::data::model::SongTable;
use crate::data::pipeline::DashboardViews;

const KDE_POINTS: usize = 200;

/// Histogram bars plus the density overlay, derived from the BPM view.
#[derive(Debug, Clone, Default)]
pub struct BpmChart {
    pub bins: Vec<HistogramBin>,
    pub kde: Vec<[f64; 2]>,
}

impl BpmChart {
    fn from_values(values: &[u32], bins: usize) -> Self {
        let values: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
        let bins = histogram(&values, bins);
        let width = bins.first().map(|b| b.width()).unwrap_or(1.0);
        BpmChart {
            kde: kde_curve(&values, width, KDE_POINTS),
            bins,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Tables loaded during this session.
    pub cache: DatasetCache,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<SongTable>>,

    /// Path the current dataset came from.
    pub source: Option<PathBuf>,

    /// Sidebar selection.
    pub filters: FilterParams,

    /// Derived views for the current filters.
    pub views: Option<DashboardViews>,

    pub bpm_chart: BpmChart,

    /// Scatter colours per artist.
    pub color_map: ColorMap,

    /// Text typed into the artist search box.
    pub artist_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            dataset: None,
            source: None,
            filters: FilterParams {
                year_range: YearRange::new(0, 0),
                artists: Default::default(),
            },
            views: None,
            bpm_chart: BpmChart::default(),
            color_map: ColorMap::default(),
            artist_query: String::new(),
            status_message: None,
        }
    }

    /// Load (or fetch from the cache) the dataset at `path` and reset the
    /// filters to cover it.  On failure the dashboard is left empty.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => {
                self.set_dataset(table, path);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.dataset = None;
                self.source = None;
                self.views = None;
                self.bpm_chart = BpmChart::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached copy of the current file and read it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.cache.invalidate(&path);
            self.open(&path);
        }
    }

    fn set_dataset(&mut self, table: Arc<SongTable>, path: &Path) {
        self.filters = FilterParams::for_table(&table);
        self.color_map = ColorMap::new(&table.artist_options);
        self.artist_query.clear();
        self.dataset = Some(table);
        self.source = Some(path.to_path_buf());
        self.status_message = None;
        self.refilter();
    }

    /// Recompute every view after a filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.dataset else {
            return;
        };
        let views = DashboardViews::compute(table, &self.filters, &self.config);
        self.bpm_chart = BpmChart::from_values(&views.bpm_values, self.config.histogram_bins);
        self.views = Some(views);
    }

    pub fn set_year_range(&mut self, lo: i32, hi: i32) {
        let range = YearRange::new(lo, hi);
        if range != self.filters.year_range {
            self.filters.year_range = range;
            self.refilter();
        }
    }

    /// Toggle a single artist in the selection.
    pub fn toggle_artist(&mut self, artist: &str) {
        if !self.filters.artists.remove(artist) {
            self.filters.artists.insert(artist.to_string());
        }
        self.refilter();
    }

    /// Deselect all artists, i.e. show every artist.
    pub fn clear_artists(&mut self) {
        if !self.filters.artists.is_empty() {
            self.filters.artists.clear();
            self.refilter();
        }
    }

    /// Write the current views as pretty JSON.
    pub fn export_views(&self, path: &Path) -> Result<()> {
        let views = self.views.as_ref().context("no dataset loaded")?;
        let json = serde_json::to_string_pretty(views).context("serializing views")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported dashboard summary to {}", path.display());
        Ok(())
    }
}
