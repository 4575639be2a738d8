//! Cell values
//!
//! Spreadsheet cells arrive untyped: text, a number, or nothing. They are
//! tagged once at the ingestion boundary and every coercion the aggregator
//! needs (numbers, labels, day keys) is applied here.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// A single spreadsheet cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty or missing cell
    #[default]
    Null,
    /// Raw numeric value
    Number(f64),
    /// Text, including formatted values such as "₹1,234.50"
    Text(String),
}

static NULL_CELL: CellValue = CellValue::Null;

impl CellValue {
    /// True for null cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text form of the cell, `None` when the cell is blank
    pub fn label(&self) -> Option<Cow<'_, str>> {
        match self {
            _ if self.is_blank() => None,
            CellValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            CellValue::Number(n) => Some(Cow::Owned(n.to_string())),
            CellValue::Null => None,
        }
    }

    /// Numeric value of the cell. Never fails: anything unparseable is zero.
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Null => 0.0,
            CellValue::Number(n) if n.is_finite() => *n,
            CellValue::Number(_) => 0.0,
            CellValue::Text(s) => parse_number(s),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// One spreadsheet record keyed by column label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: HashMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn cell(mut self, label: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(label, value);
        self
    }

    /// Set a cell. A repeated label replaces the earlier value.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(label.into(), value.into());
    }

    /// Cell under `label`; missing labels read as [`CellValue::Null`]
    pub fn get(&self, label: &str) -> &CellValue {
        self.cells.get(label).unwrap_or(&NULL_CELL)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (label, value) in iter {
            row.insert(label, value);
        }
        row
    }
}

/// Parse a loosely formatted number.
///
/// Every character other than ASCII digits, `.` and `-` is dropped, then the
/// longest leading float of what remains is parsed. Empty or malformed input
/// yields zero, so `"₹1,234.50 approx"` is `1234.5` and `"N/A"` is `0`.
pub fn parse_number(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    float_prefix(&kept)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix of `s` shaped like `-?digits(.digits)?` with at least one digit
fn float_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - (end + 1);
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }

    if digits == 0 {
        ""
    } else {
        &s[..end]
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%a, %b %d, %Y",
    "%A, %B %d, %Y",
];

/// Interpret text as a calendar date.
///
/// Accepts ISO dates and date-times, RFC 3339, US `M/D/YYYY`, month-name
/// forms and the feed's `Date(y,m,d)` literal (zero-based month). The date is
/// taken as written; no timezone conversion is applied.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = parse_date_literal(s) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `Date(2025,7,10)` or `Date(2025,7,10,14,30,0)`
fn parse_date_literal(s: &str) -> Option<NaiveDate> {
    let inner = s.strip_prefix("Date(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<i64>());

    let year = parts.next()?.ok()?;
    let month = parts.next()?.ok()?;
    let day = parts.next().unwrap_or(Ok(1)).ok()?;

    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month + 1).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Grouping key for a date cell.
///
/// Null, empty text and a zero number have no key. Recognised dates become
/// `YYYY-MM-DD`; any other text, whitespace included, is grouped under its
/// raw form. Numbers are read as epoch milliseconds.
pub fn day_key(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::Text(s) if s.is_empty() => None,
        CellValue::Number(ms) if *ms == 0.0 => None,
        CellValue::Text(s) => Some(
            parse_calendar_date(s)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| s.clone()),
        ),
        CellValue::Number(ms) => Some(
            DateTime::from_timestamp_millis(*ms as i64)
                .filter(|_| ms.is_finite())
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| ms.to_string()),
        ),
    }
}
