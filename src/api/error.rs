//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::ErrorKind;
use crate::pipeline::analysis::AnalysisError;
use crate::store::StoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Boundary status for each failure category.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRequest | ErrorKind::InvalidUrl | ErrorKind::InvalidPrediction => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::ScrapeFailed => StatusCode::BAD_GATEWAY,
        ErrorKind::ServiceUnavailable | ErrorKind::PredictionFailed | ErrorKind::Cancelled => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone()),
            ApiError::Analysis(err) => classified(err.kind(), err.to_string()),
            ApiError::Store(err) => classified(err.kind(), err.to_string()),
        };

        let body = ErrorBody {
            success: false,
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

fn classified(kind: ErrorKind, detail: String) -> (StatusCode, &'static str, String) {
    let message = if kind == ErrorKind::Internal {
        tracing::error!(detail, "API internal error");
        "An internal error occurred".to_string()
    } else {
        detail
    };
    (status_for(kind), kind.as_str(), message)
}
