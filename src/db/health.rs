//! Database liveness and replication introspection.

use crate::db::pool::DbPool;
use crate::error::{DbError, DbResult};
use crate::models::{ReplicationProbe, ReplicationState};
use chrono::{DateTime, Utc};
use tracing::info;

mod queries {
    pub const SERVER_TIME: &str = "SELECT NOW()";

    // The WAL functions return NULL on a primary; pg_lsn is cast to text since
    // it has no native decoder.
    pub const REPLICATION_STATUS: &str = r#"
        SELECT
            pg_is_in_recovery() AS is_replica,
            pg_last_wal_receive_lsn()::text AS receive_lsn,
            pg_last_wal_replay_lsn()::text AS replay_lsn,
            pg_wal_lsn_diff(pg_last_wal_receive_lsn(), pg_last_wal_replay_lsn())::bigint AS lag_bytes
        "#;
}

pub struct HealthProbe;

impl HealthProbe {
    /// Confirm connectivity and read the database server's clock.
    pub async fn server_time(pool: &DbPool) -> DbResult<DateTime<Utc>> {
        let now = sqlx::query_scalar::<_, DateTime<Utc>>(queries::SERVER_TIME)
            .fetch_one(pool.pg())
            .await?;
        Ok(now)
    }

    /// Query replication state. Never fails: any error becomes
    /// `ReplicationProbe::Unavailable`.
    pub async fn replication(pool: &DbPool) -> ReplicationProbe {
        match Self::replication_state(pool).await {
            Ok(state) => ReplicationProbe::Available(state),
            Err(e) => {
                info!(error = %e, "Replication info not available");
                ReplicationProbe::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn replication_state(pool: &DbPool) -> DbResult<ReplicationState> {
        sqlx::query_as::<_, ReplicationState>(queries::REPLICATION_STATUS)
            .fetch_one(pool.pg())
            .await
            .map_err(|e| DbError::replication_unavailable(DbError::from(e).to_string()))
    }
}
