// Main entry point - Dependency injection and console setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::console_service::ConsoleService;
use crate::infrastructure::config::load_console_config;
use crate::infrastructure::http_backend::HttpOvenBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

const DEFAULT_LOG_FILTER: &str = "reflow_console=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let config = load_console_config()?;
    let addr = config.bind_addr()?;

    // Backend adapter (infrastructure layer)
    let backend = Arc::new(HttpOvenBackend::new(
        &config.backend.base_url,
        config.request_timeout(),
    )?);
    tracing::info!(backend = %config.backend.base_url, "Connecting console to oven backend");

    // Console session (application layer); profiles load before polling starts
    let console = ConsoleService::launch(backend, &config.console_settings()).await;

    let state = Arc::new(AppState {
        console: console.service().clone(),
    });
    let router = build_router(state);

    tracing::info!("Starting reflow console on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Tear the console down first so open event streams end and the server can drain
    let shutdown = async move {
        wait_for_ctrl_c().await;
        console.shutdown().await;
    };
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
