//! HTTP server lifecycle: bind → spawn background task → return a handle
//! with a shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Handle to a running server.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Ask the server to stop accepting connections and drain. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Wait until the serving task has finished.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {e}");
        }
    }
}

/// Start serving `ctx` on `addr`. Port 0 picks an ephemeral port; the
/// bound address is reported on the handle.
pub async fn start_server_on(ctx: ApiContext, addr: SocketAddr) -> Result<ServerHandle, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
