//! Liveness check.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::http::middleware::format_uptime;
use crate::http::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    #[schema(example = "healthy")]
    pub status: String,
    /// `connected` or `disconnected`
    #[schema(example = "connected")]
    pub database: String,
    /// Process uptime, e.g. `0d 1h 2m 3s`
    pub uptime: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint - verifies the pool can serve a query.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Service and database up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let uptime = state.started_at.elapsed();
    let ping = state.probe.ping().await;

    let healthy = ping.is_ok();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        database: if healthy { "connected" } else { "disconnected" }.to_string(),
        uptime: format_uptime(uptime),
        uptime_seconds: uptime.as_secs(),
        timestamp: Utc::now(),
        error: ping.err().map(|e| {
            tracing::warn!("Health check failed: {}", e);
            e.to_string()
        }),
    };

    if healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
