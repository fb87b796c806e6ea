//! Error types for the demo API.
//!
//! All failures are modeled with `thiserror` and rendered to clients as the
//! uniform `{"success": false, "error": ...}` envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned to clients whenever internal detail must not leak.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection timeout: {message}")]
    ConnectionTimeout { message: String },

    #[error("{message}")]
    Query {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    /// Replication introspection is not supported or not permitted. Never
    /// surfaced to clients.
    #[error("Replication info not available: {message}")]
    ReplicationUnavailable { message: String },

    /// Startup schema creation failed. Logged and tolerated.
    #[error("Schema initialization failed: {message}")]
    SchemaInit { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a connection timeout error.
    pub fn connection_timeout(message: impl Into<String>) -> Self {
        Self::ConnectionTimeout {
            message: message.into(),
        }
    }

    /// Create a query error with optional SQL state.
    pub fn query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a replication unavailable error.
    pub fn replication_unavailable(message: impl Into<String>) -> Self {
        Self::ReplicationUnavailable {
            message: message.into(),
        }
    }

    /// Create a schema initialization error.
    pub fn schema_init(message: impl Into<String>) -> Self {
        Self::SchemaInit {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status used when this error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::ConnectionTimeout { .. }
            | Self::Query { .. }
            | Self::ReplicationUnavailable { .. }
            | Self::SchemaInit { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal { .. } => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                DbError::connection_timeout("timed out acquiring a database connection")
            }
            sqlx::Error::PoolClosed => DbError::query("Connection pool is closed", None),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::query(db_err.message(), code)
            }
            other => DbError::query(other.to_string(), None),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

impl IntoResponse for DbError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            match &self {
                DbError::Query { sql_state, .. } => {
                    error!(error = %self, sql_state = ?sql_state, "Request failed")
                }
                _ => error!(error = %self, "Request failed"),
            }
        }

        let body = json!({
            "success": false,
            "error": self.client_message(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_pool_timeout_maps_to_connection_timeout() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::ConnectionTimeout { .. }));
        assert!(err.to_string().contains("Connection timeout"));
    }

    #[test]
    fn test_other_sqlx_errors_map_to_query() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::Query { sql_state: None, .. }));

        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::Query { .. }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DbError::invalid_input("name is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DbError::query("relation \"records\" does not exist", Some("42P01".into()))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DbError::connection_timeout("slow").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_query_error_message_is_passed_through() {
        let err = DbError::query("relation \"records\" does not exist", None);
        assert_eq!(err.client_message(), "relation \"records\" does not exist");
    }

    #[test]
    fn test_internal_error_is_not_leaked() {
        let err = DbError::internal("stack overflow in handler");
        assert_eq!(err.client_message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_into_response_renders_envelope() {
        let response = DbError::invalid_input("name is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid input: name is required");
    }
}
