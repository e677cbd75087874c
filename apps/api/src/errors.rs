use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::layout::PaginationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pagination(PaginationError::Measurement(e)) => {
                tracing::error!("Measurement failed, build abandoned: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MEASUREMENT_FAILED",
                    "The measurement surface failed; no pages were produced".to_string(),
                )
            }
            AppError::Pagination(e @ PaginationError::InvalidLayout { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_LAYOUT",
                e.to_string(),
            ),
            AppError::Pagination(e) => {
                tracing::error!("Pagination invariant violated: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PAGINATION_FAILED",
                    "An internal pagination error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
