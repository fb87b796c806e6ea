//! `GET /api/health` - process and database health aggregation.

use crate::api::AppState;
use crate::db::HealthProbe;
use crate::models::{
    DatabaseHealth, HealthReport, HealthStatus, MemoryUsage, ReplicationProbe, ServerInfo,
};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use humansize::{BINARY, format_size};
use serde::Serialize;
use std::time::Duration;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::warn;

/// Body of the 503 response.
#[derive(Debug, Serialize)]
pub struct UnhealthyResponse {
    pub status: HealthStatus,
    pub error: String,
}

/// 200 with a full report when the database answers, 503 otherwise.
///
/// A failing replication query does not affect the status.
pub async fn health(State(state): State<AppState>) -> Response {
    let db_time = match HealthProbe::server_time(&state.pool).await {
        Ok(now) => now,
        Err(e) => {
            warn!(error = %e, "Health check failed");
            let body = UnhealthyResponse {
                status: HealthStatus::Unhealthy,
                error: e.to_string(),
            };
            return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
        }
    };

    let replication = HealthProbe::replication(&state.pool).await;

    Json(healthy_report(state.started_at.elapsed(), db_time, replication)).into_response()
}

/// Report for a database that answered `SELECT NOW()` at `db_time`.
///
/// Healthy whatever the replication outcome.
pub fn healthy_report(
    uptime: Duration,
    db_time: DateTime<Utc>,
    replication: ReplicationProbe,
) -> HealthReport {
    HealthReport {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
        server: ServerInfo {
            hostname: host_name(),
            uptime: uptime.as_secs_f64(),
            memory: memory_usage(),
        },
        database: DatabaseHealth {
            status: "connected",
            timestamp: db_time,
            replication,
        },
    }
}

fn host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Memory of the current process. Zeroes if the platform does not expose it.
pub fn memory_usage() -> MemoryUsage {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return MemoryUsage::default();
    };

    // Refresh only this process
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        false,
        ProcessRefreshKind::new().with_memory(),
    );

    match system.process(pid) {
        Some(process) => MemoryUsage {
            rss: process.memory(),
            virtual_size: process.virtual_memory(),
            rss_human: format_size(process.memory(), BINARY),
        },
        None => MemoryUsage::default(),
    }
}
