//! Database access layer.
//!
//! This module provides:
//! - Connection pool management
//! - Startup schema initialization
//! - Record queries and aggregate statistics
//! - Liveness and replication probes

pub mod health;
pub mod pool;
pub mod records;
pub mod schema;

pub use health::HealthProbe;
pub use pool::{DatabaseDescriptor, DbPool};
pub use records::RecordStore;
pub use schema::SchemaInitializer;
