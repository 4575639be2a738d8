//! Sheet Sources
//!
//! Where sales rows come from:
//! - Google Sheets public `gviz` feed (the live source)
//! - Local CSV export (offline use, demos)
//!
//! Every source yields a [`Dataset`]: the ordered column labels plus one
//! [`Row`] per record.

mod csv_file;
mod gviz;

pub use csv_file::CsvSource;
pub use gviz::{parse_gviz_response, unwrap_envelope, GvizConfig, GvizSource};

use crate::analytics::{analyze, resolve_columns, ColumnMap, Row, Snapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Common trait for all sheet sources
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Short name used in logs and status output
    fn name(&self) -> &str;

    /// Link a human can open to view the underlying sheet, if any
    fn link(&self) -> Option<String> {
        None
    }

    /// Fetch the full dataset
    async fn fetch(&self) -> Result<Dataset, SheetError>;
}

/// Columns and rows of one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Column labels in sheet order
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn column_map(&self) -> ColumnMap {
        resolve_columns(&self.columns)
    }

    /// Aggregate this dataset; `None` when it has no rows
    pub fn snapshot(&self) -> Option<Snapshot> {
        analyze(&self.columns, &self.rows)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A fixed in-memory dataset
pub struct StaticSource {
    name: String,
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            name: name.into(),
            dataset,
        }
    }
}

#[async_trait]
impl SheetSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Dataset, SheetError> {
        Ok(self.dataset.clone())
    }
}

/// Errors that can occur while fetching a sheet
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed response envelope: {0}")]
    Envelope(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sheet API error: {0}")]
    Api(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Role;

    #[tokio::test]
    async fn test_static_source() {
        let dataset = Dataset::new(
            vec!["Item".to_string(), "Qty".to_string()],
            vec![Row::new().cell("Item", "Latte").cell("Qty", "2")],
        );
        let source = StaticSource::new("memory", dataset.clone());

        assert_eq!(source.name(), "memory");
        assert!(source.link().is_none());
        assert_eq!(source.fetch().await.unwrap(), dataset);
    }

    #[test]
    fn test_dataset_snapshot() {
        let empty = Dataset::new(vec!["Item".to_string()], Vec::new());
        assert!(empty.is_empty());
        assert!(empty.snapshot().is_none());

        let dataset = Dataset::new(
            vec!["Item".to_string()],
            vec![Row::new().cell("Item", "Tea")],
        );
        assert_eq!(dataset.column_map().get(Role::Item), Some("Item"));
        assert_eq!(dataset.snapshot().unwrap().total_quantity, 1.0);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(SheetError::Http { status: 404 }.to_string(), "HTTP 404");
        assert_eq!(
            SheetError::Api("Invalid sheet".to_string()).to_string(),
            "Sheet API error: Invalid sheet"
        );
    }
}
