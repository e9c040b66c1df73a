//! Error types for the Scam Likely API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
}

impl From<scamlikely_core::Error> for ApiError {
    fn from(err: scamlikely_core::Error) -> Self {
        match err {
            scamlikely_core::Error::Validation(msg) => ApiError::Validation(msg),
            scamlikely_core::Error::NotFound { kind, id } => ApiError::NotFound { kind, id },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound { kind, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found: {}", kind, id),
            ),
            ApiError::Validation(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}
