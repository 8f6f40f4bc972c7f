use axum::{Json, body::Bytes, extract::State};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HealthResponse, now_timestamp},
    services::relay::{MESSAGE_REQUIRED, relay},
    state::SharedState,
};

// The body is parsed by hand so that an unparseable payload gets the same
// 400 as a missing message rather than axum's default rejection.
pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let payload: ChatRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest(MESSAGE_REQUIRED.to_string()))?;

    let response = relay(state.provider.as_ref(), payload).await?;
    Ok(Json(response))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "System Monitor AI Assistant API is running".to_string(),
        timestamp: now_timestamp(),
    })
}
