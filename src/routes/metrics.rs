use axum::{Json, extract::State};

use crate::services::metrics_manager::SystemMetrics;
use crate::state::SharedState;

pub async fn get_metrics_handler(State(state): State<SharedState>) -> Json<SystemMetrics> {
    Json(state.metrics.get_metrics().await)
}

pub async fn refresh_metrics_handler(State(state): State<SharedState>) -> Json<SystemMetrics> {
    Json(state.metrics.refresh().await)
}
