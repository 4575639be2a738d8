//! CSV Source
//!
//! Reads a sheet exported as CSV. The header row supplies the column labels;
//! empty cells become nulls and everything else is kept as text, so numeric
//! parsing follows the same rules as the live feed.

use super::{Dataset, SheetError, SheetSource};
use crate::analytics::{CellValue, Row};
use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};

/// CSV file source
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse CSV text (useful for testing)
    pub fn parse_str(data: &str) -> Result<Dataset, SheetError> {
        Self::parse_reader(data.as_bytes())
    }

    /// Parse CSV from any reader
    pub fn parse_reader<R: Read>(reader: R) -> Result<Dataset, SheetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Row = columns
                .iter()
                .enumerate()
                .map(|(idx, label)| {
                    let value = match record.get(idx) {
                        Some(text) if !text.is_empty() => CellValue::Text(text.to_string()),
                        _ => CellValue::Null,
                    };
                    (label.clone(), value)
                })
                .collect();
            rows.push(row);
        }

        Ok(Dataset::new(columns, rows))
    }
}

#[async_trait]
impl SheetSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn link(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }

    async fn fetch(&self) -> Result<Dataset, SheetError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let dataset = Self::parse_str(&content)?;

        tracing::info!(
            path = %self.path.display(),
            columns = dataset.columns.len(),
            rows = dataset.rows.len(),
            "Loaded CSV sheet"
        );

        Ok(dataset)
    }
}
