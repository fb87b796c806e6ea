//! Three-tier demo API library.
//!
//! A thin records CRUD and health-check service over PostgreSQL, meant to sit
//! behind a load balancer in front of a primary/replica database pair.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod transport;

pub use api::{AppState, router};
pub use config::Config;
pub use error::DbError;
