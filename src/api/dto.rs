//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::analytics::ColumnMap;
use crate::dashboard::Dashboard;
use crate::refresh::{LiveStatus, RefreshOutcome};
use serde::{Deserialize, Serialize};

// ============================================
// DASHBOARD DTOs
// ============================================

/// Optional display overrides for the dashboard view
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// Currency symbol, e.g. "$"
    #[serde(default)]
    pub currency: Option<String>,
    /// Thousands grouping: indian or western
    #[serde(default)]
    pub grouping: Option<String>,
}

/// Dashboard view response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// False when the fallback dashboard is being shown
    pub live: bool,
    pub status: LiveStatus,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

/// Column resolution response
#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    /// Source column labels in sheet order
    pub columns: Vec<String>,
    /// Role → column label
    pub roles: ColumnMap,
    /// Roles no column matched
    pub unresolved: Vec<String>,
}

// ============================================
// STATUS DTOs
// ============================================

/// Live connection status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: LiveStatus,
    /// Status bar message
    pub message: String,
    /// Sheet source name (gviz, csv)
    pub source: String,
    /// Link to open the sheet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    /// Last committed refresh (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<String>,
    pub row_count: usize,
    pub has_snapshot: bool,
}

/// Refresh trigger response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
    pub status: LiveStatus,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, starting
    pub status: String,
    /// Sheet source status: ok, error, pending
    pub source: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
