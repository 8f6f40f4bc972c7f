use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    services::auth::{Session, User},
    state::SharedState,
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register_handler(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let session = state.auth.register(&req.email, &req.password, &req.name).await?;
    Ok(session_body(session))
}

pub async fn login_handler(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let session = state.auth.login(&req.email, &req.password).await?;
    Ok(session_body(session))
}

pub async fn logout_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer(&headers)?;
    if !state.auth.logout(token).await {
        return Err(AppError::Unauthorized("Not logged in".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn session_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<User>, AppError> {
    let token = bearer(&headers)?;
    state
        .auth
        .current_session(token)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))
}

fn session_body(session: Session) -> Json<Value> {
    Json(json!({ "success": true, "token": session.token, "user": session.user }))
}

fn bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))
}
