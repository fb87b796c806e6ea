//! HTTP transport: binds the listener and serves the API until shutdown.

use crate::api::{self, AppState};
use crate::error::{DbError, DbResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// Time allowed for in-flight requests to finish after a shutdown signal.
pub const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a forced shutdown waits for the pool to close.
pub const FORCED_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct HttpTransport {
    state: AppState,
    /// Host to bind to
    host: String,
    /// Port to bind to
    port: u16,
}

impl HttpTransport {
    pub fn new(state: AppState, host: impl Into<String>, port: u16) -> Self {
        Self {
            state,
            host: host.into(),
            port,
        }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serve until SIGINT/SIGTERM, then drain requests and close the pool.
    pub async fn run(&self) -> DbResult<()> {
        let listener = self.bind().await?;
        self.serve(listener, wait_for_signal(), wait_for_signal()).await
    }

    async fn bind(&self) -> DbResult<TcpListener> {
        let bind_addr = self.bind_addr();
        TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| DbError::internal(format!("Failed to bind to {}: {}", bind_addr, e)))
    }

    /// Serve on `listener` until `shutdown` resolves, then drain.
    ///
    /// The drain ends early on `GRACEFUL_TIMEOUT` or when `force` resolves.
    /// `force` is only polled once the drain has started. After a forced exit
    /// the pool gets at most `FORCED_CLOSE_TIMEOUT` to close.
    pub async fn serve<S, F>(&self, listener: TcpListener, shutdown: S, force: F) -> DbResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
        F: Future<Output = ()>,
    {
        let app = api::router(self.state.clone());

        match listener.local_addr() {
            Ok(addr) => info!(addr = %addr, "Server running"),
            Err(_) => info!(addr = %self.bind_addr(), "Server running"),
        }

        let shutdown_notify = Arc::new(tokio::sync::Notify::new());
        let shutdown_notify_clone = shutdown_notify.clone();

        let shutdown_signal = async move {
            shutdown.await;
            shutdown_notify_clone.notify_one();
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

        // Race between: server draining normally vs forced timeout/second signal after shutdown
        let forced = tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!(error = %e, "HTTP server error");
                    self.state.pool.close_within(FORCED_CLOSE_TIMEOUT).await;
                    return Err(DbError::internal(format!("HTTP server error: {}", e)));
                }
                info!("HTTP server stopped");
                false
            }
            _ = async {
                shutdown_notify.notified().await;
                info!(
                    timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                    "Waiting for connections to close (send signal again to force exit)..."
                );

                tokio::select! {
                    _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                        warn!("Graceful shutdown timeout, forcing exit");
                    }
                    _ = force => {
                        warn!("Received second signal, forcing immediate exit");
                    }
                }
            } => true,
        };

        if forced {
            self.state.pool.close_within(FORCED_CLOSE_TIMEOUT).await;
        } else {
            self.state.pool.close().await;
        }
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down gracefully..."),
        _ = terminate => info!("SIGTERM received, shutting down gracefully..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, PoolOptions};
    use crate::db::DbPool;

    fn state() -> AppState {
        AppState::new(DbPool::connect_lazy(
            &DatabaseConfig::default(),
            &PoolOptions::default(),
        ))
    }

    #[tokio::test]
    async fn test_http_transport_bind_addr() {
        let transport = HttpTransport::new(state(), "0.0.0.0", 3000);
        assert_eq!(transport.bind_addr(), "0.0.0.0:3000");
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let transport = HttpTransport::new(state(), "127.0.0.1", port);
        let err = transport.run().await.unwrap_err();
        assert!(err.to_string().contains("Failed to bind"));
    }

    #[tokio::test]
    async fn test_serve_stops_and_closes_pool_on_shutdown() {
        let state = state();
        let pool = state.pool.clone();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let transport = HttpTransport::new(state, "127.0.0.1", 0);
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            transport.serve(listener, async {}, std::future::pending()),
        )
        .await
        .expect("serve should return once shutdown fires");

        assert!(result.is_ok());
        assert!(pool.pg().is_closed());
    }
}
