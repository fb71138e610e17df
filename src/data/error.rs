use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal errors raised while turning a file into a [`SongTable`](super::model::SongTable).
///
/// Malformed numeric cells are *not* errors; they are recovered per cell and
/// tallied in a [`CoercionReport`](super::model::CoercionReport).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is missing, unreadable, or not parseable as its format.
    #[error("failed to load {}: {source}", .path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// A required column header is absent.
    #[error("required column `{column}` is missing")]
    Schema { column: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    pub fn data_load(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        LoadError::DataLoad {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn schema(column: impl Into<String>) -> Self {
        LoadError::Schema {
            column: column.into(),
        }
    }
}
