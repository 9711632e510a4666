//! HTTP API for position results.
//!
//! ## Endpoints
//!
//! - `GET /api/latest` - Most recent estimation (404 when none yet)
//! - `GET /api/history?limit=N` - Last N estimations, oldest first (default 50)
//! - `GET /api/stats` - Fingerprint store size, known locations, scans received
//! - `POST /api/scans` - Submit a scan message for estimation
//! - `GET /health` - Liveness
//!
//! Any other path is served from the static UI directory, if one is
//! configured. All routes allow cross-origin requests.

pub mod error;
pub mod handlers;
pub mod state;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Create the API router.
///
/// When `static_dir` is given, unmatched paths fall back to files under it,
/// with `index.html` served at `/`.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/latest", get(handlers::latest))
        .route("/api/history", get(handlers::history))
        .route("/api/stats", get(handlers::stats))
        .route("/api/scans", post(handlers::submit_scan))
        .route("/health", get(handlers::health));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::ingest::IngestWorker;
    use wifi_locator_core::{CoordinateTable, FingerprintStore, PositionEstimator, ScanHistory};

    #[tokio::test]
    async fn health_endpoint() {
        let (writer, reader) = ScanHistory::new();
        let (_worker, handle) = IngestWorker::new(
            Arc::new(FingerprintStore::default()),
            Arc::new(CoordinateTable::default()),
            PositionEstimator::new(),
            writer,
            1,
        );
        let state = AppState::new(
            Arc::new(FingerprintStore::default()),
            Arc::new(CoordinateTable::default()),
            reader,
            handle,
        );

        let response = create_router(state, None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
