use std::path::PathBuf;

/// Dataset loaded at startup when no override is given.
pub const DEFAULT_DATA_FILE: &str = "Spotify Most Streamed Songs.csv";

/// Environment variable that overrides [`DEFAULT_DATA_FILE`].
pub const DATA_PATH_ENV: &str = "SPOTIFY_DASHBOARD_DATA";

pub const TOP_ARTISTS: usize = 10;
pub const HISTOGRAM_BINS: usize = 20;
pub const PREVIEW_ROWS: usize = 10;

/// Fixed dashboard settings.  Only the dataset path is tunable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub top_n: usize,
    pub histogram_bins: usize,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            top_n: TOP_ARTISTS,
            histogram_bins: HISTOGRAM_BINS,
            preview_rows: PREVIEW_ROWS,
        }
    }
}

impl DashboardConfig {
    /// Defaults, with the dataset path taken from `SPOTIFY_DASHBOARD_DATA`
    /// when it is set and non-empty.
    pub fn from_env() -> Self {
        Self::with_data_override(std::env::var_os(DATA_PATH_ENV).map(PathBuf::from))
    }

    fn with_data_override(path: Option<PathBuf>) -> Self {
        let mut config = Self::default();
        if let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) {
            config.data_path = path;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_constants() {
        let c = DashboardConfig::default();
        assert_eq!(c.top_n, 10);
        assert_eq!(c.histogram_bins, 20);
        assert_eq!(c.preview_rows, 10);
        assert_eq!(c.data_path, PathBuf::from("Spotify Most Streamed Songs.csv"));
    }

    #[test]
    fn data_override_ignores_empty_values() {
        let c = DashboardConfig::with_data_override(Some(PathBuf::from("other.parquet")));
        assert_eq!(c.data_path, PathBuf::from("other.parquet"));
        let c = DashboardConfig::with_data_override(Some(PathBuf::new()));
        assert_eq!(c.data_path, PathBuf::from(DEFAULT_DATA_FILE));
    }
}
