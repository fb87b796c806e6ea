//! Connection pool management.
//!
//! The pool is created lazily: no connection is opened until the first query,
//! so the service starts even while the database is still coming up.

use crate::config::{DatabaseConfig, PoolOptions};
use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

/// Which database the pool talks to, as reported by `/api/stats`. No secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseDescriptor {
    pub host: String,
    pub name: String,
}

/// Shared handle to the PostgreSQL pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
    descriptor: DatabaseDescriptor,
}

impl DbPool {
    /// Build a pool without connecting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(config: &DatabaseConfig, options: &PoolOptions) -> Self {
        let mut connect_options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .application_name(env!("CARGO_PKG_NAME"));

        if let Some(password) = &config.password {
            connect_options = connect_options.password(password);
        }

        let pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(options.max_connections)
            .idle_timeout(Some(options.idle_timeout))
            .acquire_timeout(options.connect_timeout)
            .connect_lazy_with(connect_options);

        info!(
            database = %config.masked_connection_string(),
            max_connections = options.max_connections,
            idle_timeout = ?options.idle_timeout,
            connect_timeout = ?options.connect_timeout,
            "Created database pool"
        );

        Self {
            pool,
            descriptor: DatabaseDescriptor {
                host: config.host.clone(),
                name: config.database.clone(),
            },
        }
    }

    /// Get a reference to the underlying sqlx pool.
    pub fn pg(&self) -> &PgPool {
        &self.pool
    }

    pub fn descriptor(&self) -> &DatabaseDescriptor {
        &self.descriptor
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        info!("Closing database connections");
        self.pool.close().await;
        info!("All connections closed");
    }

    /// Like [`DbPool::close`], but gives up after `limit`.
    ///
    /// New acquires fail immediately either way. Returns `false` if some
    /// connection was still checked out when the limit passed.
    pub async fn close_within(&self, limit: Duration) -> bool {
        match tokio::time::timeout(limit, self.close()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    in_use = (self.pool.size() as usize).saturating_sub(self.pool.num_idle()),
                    "Connections still checked out, not waiting for them"
                );
                false
            }
        }
    }
}
