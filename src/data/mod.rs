/// Data layer: loading, filtering and the derived dashboard views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────────┐
///   │ cache/loader │  parse file once → Arc<SongTable>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range + artists → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  five views  → DashboardViews (pipeline)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod pipeline;
