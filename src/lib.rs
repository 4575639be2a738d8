//! # Luma
//!
//! Live sales analytics for a small café. Sales rows are pulled from a
//! Google Sheet (or a local CSV export), columns are matched to their
//! meaning by name, and the rows are folded into a dashboard snapshot:
//! revenue, items sold, best seller, daily average, item distribution and
//! per-day breakdowns.
//!
//! ## Modules
//!
//! - [`analytics`]: Cell parsing, column resolution and the aggregator
//! - [`sheet`]: Sheet sources (gviz feed, CSV)
//! - [`dashboard`]: KPI view model and money formatting
//! - [`refresh`]: Last-request-wins refresh coordinator
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use luma::sheet::{CsvSource, SheetSource};
//! use luma::dashboard::{Dashboard, DisplayOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = CsvSource::new("sales.csv").fetch().await?;
//!
//!     let dashboard = Dashboard::from_optional(
//!         dataset.snapshot().as_ref(),
//!         &DisplayOptions::default(),
//!     );
//!
//!     for kpi in &dashboard.kpis {
//!         println!("{}: {}", kpi.label, kpi.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod refresh;
pub mod sheet;

// Re-export top-level types for convenience
pub use analytics::{
    aggregate, analyze, resolve_columns, BestItem, CellValue, ColumnMap, DailyBreakdown,
    DayTotals, ItemQuantity, Role, Row, Snapshot,
};

pub use sheet::{CsvSource, Dataset, GvizConfig, GvizSource, SheetError, SheetSource, StaticSource};

pub use dashboard::{Dashboard, DisplayOptions, Grouping, Kpi};

pub use refresh::{LiveState, LiveStatus, RefreshCoordinator, RefreshOutcome};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
