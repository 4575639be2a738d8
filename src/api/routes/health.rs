//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (first refresh finished)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::refresh::LiveStatus;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Ready once the first refresh has finished, even if it failed: the
/// dashboard can always be served, with fallback data if need be.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.coordinator.has_completed().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let live = state.coordinator.state().await;

    let (status, source) = match (&live.status, live.completed) {
        (LiveStatus::Failed { .. }, _) => ("degraded", "error"),
        (_, true) => ("healthy", "ok"),
        (_, false) => ("starting", "pending"),
    };

    Json(HealthResponse {
        status: status.to_string(),
        source: source.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
