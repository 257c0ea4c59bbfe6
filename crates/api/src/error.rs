//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use invoicer_shared::AppError;
use serde_json::json;
use tracing::error;

/// Renders an error as `{"error": code, "message": text}`.
///
/// Server errors are logged and answered with a generic message.
pub fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match &err {
        AppError::NotFound(msg)
        | AppError::Validation(msg)
        | AppError::Conflict(msg) => msg.clone(),
        AppError::Database(_) | AppError::Internal(_) => {
            error!(error = %err, "Request failed");
            "An error occurred".to_string()
        }
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}
