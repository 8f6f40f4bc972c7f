use std::sync::Arc;

use anyhow::Context;
use sysmon_relay::{
    config::Config,
    routes,
    services::gemini::GeminiClient,
    state::AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sysmon_relay=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    let addr = config.bind_addr()?;

    let provider = Arc::new(GeminiClient::from_config(&config));
    let state = Arc::new(AppState::new(provider));
    let ticker = state.metrics.spawn_ticker(config.metrics_interval);

    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(model = %config.model, "System Monitor AI Assistant API running on port {}", config.port);
    info!("Health check: http://localhost:{}/api/health", config.port);
    info!("Chat endpoint: http://localhost:{}/api/chat", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    ticker.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
