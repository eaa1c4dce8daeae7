//! HTTP server lifecycle: bind, serve in a background task, graceful
//! shutdown over a oneshot channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api::router::build_router;
use crate::state::AppState;

pub struct ApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Bind and start serving. Returns once the listener is bound, so
    /// `addr()` is immediately usable (port 0 resolves to the real port).
    pub async fn start(
        bind_addr: SocketAddr,
        state: Arc<AppState>,
        allowed_origins: &[String],
    ) -> Result<Self, String> {
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| format!("failed to bind {bind_addr}: {e}"))?;
        let addr = listener
            .local_addr()
            .map_err(|e| format!("failed to read local address: {e}"))?;

        let router = build_router(state, allowed_origins);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let serve = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "HTTP server terminated with error");
            }
        });

        tracing::info!(%addr, "HTTP server listening");
        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
