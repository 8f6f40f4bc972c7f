pub mod auth;
pub mod device;
pub mod gemini;
pub mod metrics_manager;
pub mod provider;
pub mod relay;
