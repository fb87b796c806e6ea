//! `GET /` - service descriptor.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub data: &'static str,
    pub stats: &'static str,
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Welcome to 3-Tier Infrastructure API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            health: "/api/health",
            data: "/api/data",
            stats: "/api/stats",
        },
    })
}
