//! Database connectivity check.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::http::AppState;
use crate::infra::DatabaseInfo;

/// Status value reported when the probe succeeds
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// Status value reported when the probe fails
pub const STATUS_ERROR: &str = "ERROR";

/// Connectivity probe result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionStatus {
    /// `SUCCESS` or `ERROR`
    #[schema(example = "SUCCESS")]
    pub status: String,
    /// Human-readable outcome, including the cause on failure
    pub message: String,
    /// Database product name
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "PostgreSQL")]
    pub database: Option<String>,
    /// Database product version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ConnectionStatus {
    fn success(info: DatabaseInfo) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: format!("Successfully connected to {}", info.product_name),
            database: Some(info.product_name),
            version: Some(info.product_version),
        }
    }

    fn failure(cause: impl std::fmt::Display) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: format!("Failed to connect to the database: {}", cause),
            database: None,
            version: None,
        }
    }
}

/// Create connectivity routes
pub fn connection_routes() -> Router<AppState> {
    Router::new().route("/test-connection", get(test_connection))
}

/// Acquire a pooled connection and report the database product and version
#[utoipa::path(
    get,
    path = "/api/test-connection",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Database reachable", body = ConnectionStatus),
        (status = 500, description = "Database unreachable", body = ConnectionStatus)
    )
)]
pub async fn test_connection(State(state): State<AppState>) -> (StatusCode, Json<ConnectionStatus>) {
    match state.probe.probe().await {
        Ok(info) => {
            tracing::debug!(database = %info.product_name, "Connectivity probe succeeded");
            (StatusCode::OK, Json(ConnectionStatus::success(info)))
        }
        Err(e) => {
            tracing::error!("Connectivity probe failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConnectionStatus::failure(e)),
            )
        }
    }
}
