//! Health report models.
//!
//! A `HealthReport` is built per request and never stored.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub server: ServerInfo,
    pub database: DatabaseHealth,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub hostname: String,
    /// Seconds since the service started
    pub uptime: f64,
    pub memory: MemoryUsage,
}

/// Process memory in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub rss: u64,
    #[serde(rename = "virtual")]
    pub virtual_size: u64,
    /// `rss` rendered with binary units, e.g. "12.5 MiB"
    pub rss_human: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHealth {
    /// Always "connected"; an unreachable database produces no report
    pub status: &'static str,
    /// Server clock reading from `SELECT NOW()`
    pub timestamp: DateTime<Utc>,
    pub replication: ReplicationProbe,
}

/// Row returned by the replication status query.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReplicationState {
    pub is_replica: bool,
    pub receive_lsn: Option<String>,
    pub replay_lsn: Option<String>,
    /// Received minus replayed WAL position
    pub lag_bytes: Option<i64>,
}

/// Outcome of the replication introspection sub-query.
///
/// Serializes as `{"active": true, "isReplica": ..., ...}` when available and
/// as `{"active": false}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicationProbe {
    Available(ReplicationState),
    Unavailable { reason: String },
}

impl Serialize for ReplicationProbe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Available(state) => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("active", &true)?;
                map.serialize_entry("isReplica", &state.is_replica)?;
                map.serialize_entry("receiveLsn", &state.receive_lsn)?;
                map.serialize_entry("replayLsn", &state.replay_lsn)?;
                map.serialize_entry("lagBytes", &state.lag_bytes)?;
                map.end()
            }
            Self::Unavailable { .. } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("active", &false)?;
                map.end()
            }
        }
    }
}
