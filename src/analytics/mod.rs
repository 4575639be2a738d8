//! Sales Analytics
//!
//! The part of Luma that actually computes anything. Raw spreadsheet rows go
//! in, an immutable [`Snapshot`] comes out.
//!
//! ## Pipeline
//!
//! 1. [`cell`]: tagged cell values, the numeric parsing rule and day keys
//! 2. [`columns`]: maps arbitrary column labels onto canonical roles
//! 3. [`aggregate`]: one linear pass over the rows, then derived outputs
//!
//! ## Example
//!
//! ```rust
//! use luma::analytics::{analyze, CellValue, Row};
//!
//! let columns = vec!["Order Date".to_string(), "Menu Item".to_string(), "Qty".to_string()];
//! let rows = vec![
//!     Row::new()
//!         .cell("Order Date", "2025-08-10")
//!         .cell("Menu Item", "Latte")
//!         .cell("Qty", CellValue::Number(2.0)),
//! ];
//!
//! let snapshot = analyze(&columns, &rows).expect("one row yields a snapshot");
//! assert_eq!(snapshot.best_item.name, "Latte");
//! assert_eq!(snapshot.total_quantity, 2.0);
//! ```

pub mod aggregate;
pub mod cell;
pub mod columns;
pub mod snapshot;

pub use aggregate::{aggregate, analyze};
pub use cell::{day_key, parse_calendar_date, parse_number, CellValue, Row};
pub use columns::{resolve_columns, ColumnMap, Role};
pub use snapshot::{
    BestItem, DailyBreakdown, DayTotals, ItemQuantity, Snapshot, BEST_ITEM_PLACEHOLDER,
    DAILY_TOP_ITEMS, DISTRIBUTION_SLOTS, OTHERS_LABEL, OTHER_CATEGORY, SERIES_DAYS,
    UNKNOWN_ITEM,
};
