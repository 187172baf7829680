use anyhow::Context;
use std::net::SocketAddr;

use crate::app::{router, AppState};
use crate::auth::verifier_from_config;
use crate::config::AppConfig;
use crate::database::open_store;

/// Wires storage and identity verification from configuration
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;
    let verifier = verifier_from_config(&config.auth)?;
    let store = open_store(&config.database)
        .await
        .context("failed to open database")?;
    Ok(AppState::new(store, verifier))
}

/// Serves the API until ctrl-c
pub async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let app = router(state, config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    let local: SocketAddr = listener.local_addr()?;

    tracing::info!("Listening on http://{} ({:?})", local, config.environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
