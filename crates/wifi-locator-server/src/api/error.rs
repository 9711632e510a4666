//! API error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ingest::IngestError;
use wifi_locator_core::HistoryError;

/// Errors returned by the query and submission endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Nothing to return yet (404).
    #[error("{0}")]
    NotFound(String),

    /// Invalid request parameters or body (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The ingestion worker is gone (503).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected failure (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Empty => Self::NotFound("No data".to_string()),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MalformedInput(e) => Self::BadRequest(e.to_string()),
            IngestError::WorkerClosed => Self::ServiceUnavailable(err.to_string()),
            IngestError::ProcessingFault { .. } => Self::Internal(err.to_string()),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable message
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(_) | Self::ServiceUnavailable(_) => {
                tracing::error!(error = %self, "API error");
            }
            _ => {
                tracing::debug!(error = %self, "API error");
            }
        }

        let body = ErrorResponse {
            code: self.error_code(),
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::from(HistoryError::Empty).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(IngestError::WorkerClosed).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ApiError::BadRequest("x".into()).error_code(), "BAD_REQUEST");
    }
}
