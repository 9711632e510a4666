//! REST handlers.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use wifi_locator_core::{HistoryEntry, LocationId};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Default number of entries returned by `/api/history`.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Query parameters for `/api/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Body of `/api/stats`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Distinct access points in the fingerprint store.
    pub total_macs: usize,
    /// Known locations, sentinel last.
    pub locations: Vec<LocationId>,
    /// Scans recorded in the history.
    pub scans_received: usize,
}

/// `GET /api/latest`
pub async fn latest(State(state): State<AppState>) -> ApiResult<Json<HistoryEntry>> {
    Ok(Json(state.history().latest()?))
}

/// `GET /api/history?limit=N`
pub async fn history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let limit = usize::try_from(limit)
        .map_err(|_| ApiError::BadRequest(format!("limit must be >= 0, got {limit}")))?;
    Ok(Json(state.history().recent(limit)))
}

/// `GET /api/stats`
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_macs: state.store().len(),
        locations: state.coords().location_ids(),
        scans_received: state.history().len(),
    })
}

/// `POST /api/scans`: queue a scan message for estimation.
pub async fn submit_scan(State(state): State<AppState>, body: Bytes) -> ApiResult<StatusCode> {
    state.ingest().submit_raw(&body).await?;
    Ok(StatusCode::ACCEPTED)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": wifi_locator_core::VERSION,
        "uptime_secs": state.uptime_secs(),
        "scans_received": state.history().len(),
    }))
}
