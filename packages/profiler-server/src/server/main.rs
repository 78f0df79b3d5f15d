// Main entry point for the profiler API server

use anyhow::{Context, Result};
use profiler_server::{
    server::{build_app, build_profiler, AppState},
    ServerConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,site_profiler=debug,profiler_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting site profiler API");

    // Load configuration
    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(renderer = ?config.renderer, "Configuration loaded");

    // Build pipeline (probes the renderer once)
    let profiler = build_profiler(&config).await?;
    tracing::info!(renderer = profiler.renderer_status().as_str(), "Profiler ready");

    let app = build_app(AppState::new(profiler));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
