//! Startup schema initialization.

use crate::db::pool::DbPool;
use crate::error::{DbError, DbResult};
use tracing::{error, info};

pub const CREATE_RECORDS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS records (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        value INTEGER,
        timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#;

pub struct SchemaInitializer;

impl SchemaInitializer {
    /// Ensure the `records` table exists. Idempotent.
    pub async fn ensure_records_table(pool: &DbPool) -> DbResult<()> {
        sqlx::query(CREATE_RECORDS_TABLE)
            .execute(pool.pg())
            .await
            .map_err(|e| DbError::schema_init(DbError::from(e).to_string()))?;
        Ok(())
    }

    /// Run initialization, logging the outcome. Failure does not stop the
    /// service; requests then fail individually until the table exists.
    pub async fn run(pool: &DbPool) {
        match Self::ensure_records_table(pool).await {
            Ok(()) => info!("Database initialized successfully"),
            Err(e) => error!(error = %e, "Database initialization failed"),
        }
    }
}
