//! Data models for the demo API.
//!
//! This module re-exports all model types used throughout the application.

pub mod health;
pub mod record;
pub mod stats;

// Re-export commonly used types
pub use health::{
    DatabaseHealth, HealthReport, HealthStatus, MemoryUsage, ReplicationProbe, ReplicationState,
    ServerInfo,
};
pub use record::{LIST_LIMIT, MAX_NAME_LEN, NewRecord, Record, RecordInput};
pub use stats::{Aggregates, Statistics};
