//! Refresh Routes
//!
//! - POST /api/v1/refresh - Re-fetch the sheet now
//!
//! A refresh that is overtaken by a newer one reports `superseded`; its data
//! is never shown.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::RefreshResponse;
use crate::api::state::AppState;

/// POST /api/v1/refresh
pub async fn trigger_refresh(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    let outcome = state.coordinator.refresh().await;
    let status = state.coordinator.state().await.status;

    tracing::info!(?outcome, "Manual refresh finished");

    Json(RefreshResponse { outcome, status })
}
