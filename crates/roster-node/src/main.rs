//! Roster Node - in-memory user management API.
//!
//! This is the main entry point for running the HTTP server.

use anyhow::Context;
use clap::Parser;
use roster_node::api::{create_router, ApiSettings, AppState};
use roster_node::config::Config;
use roster_node::observability::init_logging;
use roster_users::UserStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    init_logging(&config.log_level, config.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Roster node");

    let addr = config.listen_addr();
    tracing::info!(
        addr = %addr,
        expose_errors = config.expose_errors,
        max_body_bytes = config.max_body_bytes,
        "Node configuration"
    );

    if config.expose_errors {
        tracing::warn!("Panic details will be included in 500 responses");
    }

    let users = Arc::new(UserStore::seeded());
    tracing::info!(users = users.len(), "User store seeded");

    let state = AppState::with_settings(users, ApiSettings::from(&config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
