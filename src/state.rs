// src/state.rs
use std::sync::Arc;

use crate::services::auth::AuthService;
use crate::services::metrics_manager::MetricsManager;
use crate::services::provider::ChatProvider;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub metrics: MetricsManager,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            metrics: MetricsManager::default(),
            auth: AuthService::new(),
        }
    }
}
