//! Gateway startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_gateway`] which launches the HTTP + `WebSocket`
//! server on a background Tokio task. The engine binary calls this
//! during startup so the gateway runs concurrently with the broadcast
//! loop.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the gateway server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the gateway HTTP server on a background Tokio task.
///
/// Binds to `{host}:{port}` and serves the REST API plus the
/// `WebSocket` telemetry stream. Returns a [`JoinHandle`] so the caller
/// can manage the server's lifecycle alongside the broadcast loop.
///
/// The server runs until the Tokio runtime is shut down or the task is
/// aborted.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the bind address cannot be
/// parsed. Bind failures on the actual listener surface in the spawned
/// task's log output.
pub async fn spawn_gateway(
    host: &str,
    port: u16,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let config = ServerConfig {
        host: host.to_owned(),
        port,
    };

    // Verify the address is parseable before spawning the background task.
    // The actual bind happens inside start_server, but we catch obvious
    // misconfigurations early.
    let addr_str = format!("{}:{}", config.host, config.port);
    let _: std::net::SocketAddr = addr_str.parse().map_err(|e| {
        StartupError::Server(ServerError::Bind(format!("invalid address {addr_str}: {e}")))
    })?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state).await {
            tracing::error!(error = %e, "Gateway server exited with error");
        }
    });

    tracing::info!(port, "Gateway server spawned on background task");

    Ok(handle)
}
