// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::provider::ProviderError;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before any upstream call. Rendered as `{"error": msg}`.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Provider(e) => {
                error!(error = %e, "chat error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to process chat message",
                        "details": e.to_string(),
                    })),
                )
                    .into_response()
            }
            AppError::Validation(msg) => failure(StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => failure(StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => failure(StatusCode::CONFLICT, msg),
        }
    }
}

fn failure(status: StatusCode, msg: String) -> Response {
    (status, Json(json!({ "success": false, "error": msg }))).into_response()
}
