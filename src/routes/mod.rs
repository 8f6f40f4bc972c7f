// src/routes/mod.rs
pub mod auth;
pub mod chat;
pub mod device;
pub mod metrics;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    let auth_routes = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/logout", post(auth::logout_handler))
        .route("/session", get(auth::session_handler));

    let api = Router::new()
        .route("/chat", post(chat::chat_handler))
        .route("/health", get(chat::health_handler))
        .route("/devices", get(device::devices_handler))
        .route("/metrics", get(metrics::get_metrics_handler))
        .route("/metrics/refresh", post(metrics::refresh_metrics_handler))
        .nest("/auth", auth_routes);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
