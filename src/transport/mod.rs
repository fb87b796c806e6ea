//! Transport layer for the demo API.

pub mod http;

pub use http::HttpTransport;
