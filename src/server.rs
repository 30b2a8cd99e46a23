// ABOUTME: HTTP server lifecycle: bind, serve, background sweeper, graceful shutdown
// ABOUTME: The sweeper task is aborted and the pool closed once the listener stops
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use goya_core::errors::{AppError, AppResult};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::context::ServerResources;
use crate::database::Database;
use crate::notifications;
use crate::routes;

/// Connect the database and build the shared resources
///
/// # Errors
///
/// Returns an error if the database or notifier cannot be initialized
pub async fn bootstrap(config: ServerConfig) -> AppResult<Arc<ServerResources>> {
    let database = Database::new(&config.database.url, config.database.max_connections).await?;
    let notifier = notifications::from_config(&config.mail)?;
    Ok(Arc::new(ServerResources::new(database, config, notifier)))
}

/// Serve HTTP until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = resources.config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    let sweeper = resources
        .sweeper
        .clone()
        .start_scheduler(resources.config.sweeper.interval);

    info!(%addr, "GOYA server listening");
    let app = routes::router(Arc::clone(&resources));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("HTTP server error: {e}")));

    sweeper.abort();
    resources.database.close().await;
    info!("GOYA server stopped");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
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
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
