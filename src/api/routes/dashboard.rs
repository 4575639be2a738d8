//! Dashboard Routes
//!
//! Read-only views over the live state.
//!
//! - GET /api/v1/dashboard - KPI cards, chart series, daily summaries
//! - GET /api/v1/snapshot - Raw aggregate snapshot
//! - GET /api/v1/columns - Source columns and their resolved roles
//! - GET /api/v1/status - Connection status

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::analytics::Snapshot;
use crate::api::dto::{
    ColumnsResponse, DashboardParams, DashboardResponse, StatusResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{Dashboard, DisplayOptions, Grouping};

/// GET /api/v1/dashboard
///
/// Falls back to the demo dashboard while no snapshot is available;
/// `live` tells the two apart.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardResponse>> {
    let display = display_options(&state.display, &params)?;
    let live = state.coordinator.state().await;

    Ok(Json(DashboardResponse {
        live: live.snapshot.is_some(),
        status: live.status,
        dashboard: Dashboard::from_optional(live.snapshot.as_deref(), &display),
    }))
}

fn display_options(base: &DisplayOptions, params: &DashboardParams) -> ApiResult<DisplayOptions> {
    let mut display = base.clone();

    if let Some(currency) = &params.currency {
        display.currency_symbol = currency.clone();
    }
    if let Some(grouping) = &params.grouping {
        display.grouping = grouping.parse::<Grouping>().map_err(ApiError::Validation)?;
    }

    Ok(display)
}

/// GET /api/v1/snapshot
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> ApiResult<Json<Snapshot>> {
    let snapshot = state
        .coordinator
        .snapshot()
        .await
        .ok_or(ApiError::NoSnapshot)?;

    Ok(Json(snapshot.as_ref().clone()))
}

/// GET /api/v1/columns
pub async fn get_columns(State(state): State<Arc<AppState>>) -> Json<ColumnsResponse> {
    let live = state.coordinator.state().await;

    Json(ColumnsResponse {
        unresolved: live
            .column_map
            .unresolved()
            .into_iter()
            .map(|role| role.to_string())
            .collect(),
        columns: live.columns,
        roles: live.column_map,
    })
}

/// GET /api/v1/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let live = state.coordinator.state().await;
    let source = state.coordinator.source();

    Json(StatusResponse {
        message: live.status.message(),
        status: live.status,
        source: source.name().to_string(),
        sheet_url: source.link(),
        refreshed_at: live.refreshed_at.map(|t| t.to_rfc3339()),
        row_count: live.row_count,
        has_snapshot: live.snapshot.is_some(),
    })
}
