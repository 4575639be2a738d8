//! Google Sheets gviz feed
//!
//! Public sheets can be read without an API key through the visualization
//! endpoint. The JSON payload arrives wrapped in a JavaScript callback, e.g.
//! `/*O_o*/ google.visualization.Query.setResponse({...});`.

use super::{Dataset, SheetError, SheetSource};
use crate::analytics::{CellValue, Row};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Configuration for the gviz source
#[derive(Debug, Clone)]
pub struct GvizConfig {
    /// Scheme and host of the Sheets service
    pub base_url: String,
    /// Spreadsheet ID from the sheet URL
    pub sheet_id: String,
    /// Tab name
    pub sheet_name: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for GvizConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docs.google.com".to_string(),
            sheet_id: String::new(),
            sheet_name: "Sheet1".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Reads a public Google Sheet through the gviz JSON endpoint
pub struct GvizSource {
    client: Client,
    config: GvizConfig,
}

impl GvizSource {
    pub fn new(config: GvizConfig) -> Result<Self, SheetError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GvizConfig {
        &self.config
    }

    /// Query URL for the configured sheet tab
    pub fn query_url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:json&sheet={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.sheet_id,
            urlencoding::encode(&self.config.sheet_name)
        )
    }

    /// Browser URL for editing the sheet
    pub fn edit_url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/edit",
            self.config.base_url.trim_end_matches('/'),
            self.config.sheet_id
        )
    }
}

#[async_trait]
impl SheetSource for GvizSource {
    fn name(&self) -> &str {
        "gviz"
    }

    fn link(&self) -> Option<String> {
        Some(self.edit_url())
    }

    async fn fetch(&self) -> Result<Dataset, SheetError> {
        let url = self.query_url();
        let started = Instant::now();

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let dataset = parse_gviz_response(&body)?;

        tracing::info!(
            sheet = %self.config.sheet_name,
            columns = dataset.columns.len(),
            rows = dataset.rows.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Fetched sheet"
        );

        Ok(dataset)
    }
}

/// Slice the JSON object out of its callback wrapper: everything from the
/// first `{` to the last `}` inclusive.
pub fn unwrap_envelope(body: &str) -> Result<&str, SheetError> {
    let start = body
        .find('{')
        .ok_or_else(|| SheetError::Envelope("no opening brace".to_string()))?;
    let end = body
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| SheetError::Envelope("no closing brace".to_string()))?;

    Ok(&body[start..=end])
}

#[derive(Debug, Deserialize)]
struct GvizResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<GvizMessage>,
    #[serde(default)]
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizMessage {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detailed_message: Option<String>,
}

impl GvizMessage {
    fn describe(&self) -> String {
        self.detailed_message
            .as_deref()
            .or(self.message.as_deref())
            .or(self.reason.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizColumn {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: serde_json::Value,
    #[serde(default)]
    f: Option<String>,
}

impl GvizCell {
    /// Formatted value wins over the raw one
    fn into_value(self) -> CellValue {
        if let Some(formatted) = self.f {
            return CellValue::Text(formatted);
        }

        match self.v {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::String(s) => CellValue::Text(s),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Null),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Parse a full gviz response body into a dataset
pub fn parse_gviz_response(body: &str) -> Result<Dataset, SheetError> {
    let json = unwrap_envelope(body)?;
    let response: GvizResponse = serde_json::from_str(json)?;

    if response.status.as_deref() == Some("error") {
        let messages: Vec<String> = response.errors.iter().map(GvizMessage::describe).collect();
        return Err(SheetError::Api(if messages.is_empty() {
            "unknown error".to_string()
        } else {
            messages.join("; ")
        }));
    }

    let table = response
        .table
        .ok_or_else(|| SheetError::Envelope("response has no table".to_string()))?;

    let columns: Vec<String> = table
        .cols
        .into_iter()
        .map(|c| c.label.unwrap_or_default())
        .collect();

    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            let mut cells = row.c.into_iter();
            columns
                .iter()
                .map(|label| {
                    let value = cells
                        .next()
                        .flatten()
                        .map(GvizCell::into_value)
                        .unwrap_or(CellValue::Null);
                    (label.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;

    const SAMPLE: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","sig":"1","table":{"cols":[{"id":"A","label":"Date","type":"date","pattern":"M/d/yyyy"},{"id":"B","label":"Item","type":"string"},{"id":"C","label":"Qty","type":"number","pattern":"General"},{"id":"D","label":"Amount","type":"number"},{"id":"E","type":"string"}],"rows":[{"c":[{"v":"Date(2025,7,10)","f":"8/10/2025"},{"v":"Latte"},{"v":3.0,"f":"3"},{"v":450.0,"f":"₹450.00"},null]},{"c":[{"v":"Date(2025,7,11)"},{"v":"Momo"},{"v":5.0},null]}],"parsedNumHeaders":1}});"#;

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(unwrap_envelope("cb({\"a\":{}});").unwrap(), "{\"a\":{}}");
        assert!(matches!(
            unwrap_envelope("no json here"),
            Err(SheetError::Envelope(_))
        ));
        assert!(matches!(unwrap_envelope("} {"), Err(SheetError::Envelope(_))));
    }

    #[test]
    fn test_parse_sample_response() {
        let dataset = parse_gviz_response(SAMPLE).unwrap();

        assert_eq!(dataset.columns, vec!["Date", "Item", "Qty", "Amount", ""]);
        assert_eq!(dataset.rows.len(), 2);

        let first = &dataset.rows[0];
        assert_eq!(first.get("Date"), &CellValue::from("8/10/2025"));
        assert_eq!(first.get("Item"), &CellValue::from("Latte"));
        assert_eq!(first.get("Qty"), &CellValue::from("3"));
        assert_eq!(first.get("Amount"), &CellValue::from("₹450.00"));
        assert_eq!(first.get(""), &CellValue::Null);

        // Short rows pad with nulls
        let second = &dataset.rows[1];
        assert_eq!(second.get("Date"), &CellValue::from("Date(2025,7,11)"));
        assert_eq!(second.get("Qty"), &CellValue::Number(5.0));
        assert_eq!(second.get("Amount"), &CellValue::Null);
    }

    #[test]
    fn test_sample_aggregates() {
        let snapshot = parse_gviz_response(SAMPLE).unwrap().snapshot().unwrap();

        assert_eq!(snapshot.total_quantity, 8.0);
        assert_eq!(snapshot.total_revenue, 450.0);
        assert_eq!(snapshot.best_item.name, "Momo");
        let days: Vec<&str> = snapshot.daily_series.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["2025-08-10", "2025-08-11"]);
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"google.visualization.Query.setResponse({"status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY","detailed_message":"Invalid sheet name: Sheet9"}]});"#;

        match parse_gviz_response(body) {
            Err(SheetError::Api(msg)) => assert_eq!(msg, "Invalid sheet name: Sheet9"),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_gviz_response("setResponse({not json});"),
            Err(SheetError::Json(_))
        ));
    }

    #[test]
    fn test_urls() {
        let source = GvizSource::new(GvizConfig {
            sheet_id: "abc123".to_string(),
            sheet_name: "Sales Aug".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            source.query_url(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:json&sheet=Sales%20Aug"
        );
        assert_eq!(
            source.link().as_deref(),
            Some("https://docs.google.com/spreadsheets/d/abc123/edit")
        );
    }

    async fn spawn_feed(status: StatusCode) -> String {
        let app = Router::new().route(
            "/spreadsheets/d/:id/gviz/tq",
            get(move |Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("tqx").map(String::as_str), Some("out:json"));
                (status, SAMPLE)
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_from_feed() {
        let base_url = spawn_feed(StatusCode::OK).await;
        let source = GvizSource::new(GvizConfig {
            base_url,
            sheet_id: "abc".to_string(),
            ..Default::default()
        })
        .unwrap();

        let dataset = source.fetch().await.unwrap();
        assert_eq!(dataset.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let base_url = spawn_feed(StatusCode::NOT_FOUND).await;
        let source = GvizSource::new(GvizConfig {
            base_url,
            sheet_id: "abc".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            source.fetch().await,
            Err(SheetError::Http { status: 404 })
        ));
    }
}
