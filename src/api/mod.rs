//! HTTP API: routes, shared state and cross-cutting layers.

pub mod health;
pub mod index;
pub mod records;
pub mod stats;

use crate::db::DbPool;
use crate::error::GENERIC_ERROR_MESSAGE;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::any::Any;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// State injected into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// Service start, for the uptime in health reports
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            started_at: Instant::now(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/api/health", get(health::health))
        .route(
            "/api/data",
            get(records::list_records).post(records::create_record),
        )
        .route("/api/stats", get(stats::statistics))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        // The dashboard is served by the web tier on another origin
        .layer(CorsLayer::permissive())
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": format!("Not found: {}", uri.path()),
        })),
    )
}

/// Last-resort handler: log the detail, return a generic 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Unhandled error while serving request");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": GENERIC_ERROR_MESSAGE,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_panic_response_hides_detail() {
        let response = handle_panic(Box::new("index out of bounds".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal server error");
    }
}
