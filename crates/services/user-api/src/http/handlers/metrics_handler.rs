//! Request metrics endpoints.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use common::AppResult;

use crate::http::middleware::{EndpointMetrics, ServerMetrics};
use crate::http::AppState;

/// Store-side counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreMetrics {
    pub total_users: u64,
}

/// Metrics snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResponse {
    pub server: ServerMetrics,
    /// Busiest endpoints first
    pub endpoints: Vec<EndpointMetrics>,
    pub database: StoreMetrics,
    pub timestamp: DateTime<Utc>,
}

/// Metrics reset acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Create metrics routes
pub fn metrics_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/metrics/reset", post(reset_metrics))
}

/// Request counters since start-up or the last reset
#[utoipa::path(
    get,
    path = "/api/metrics",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Current counters", body = MetricsResponse),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn get_metrics(State(state): State<AppState>) -> AppResult<Json<MetricsResponse>> {
    let total_users = state.users.count_users().await?;

    Ok(Json(MetricsResponse {
        server: state.metrics.server(),
        endpoints: state.metrics.endpoints(),
        database: StoreMetrics { total_users },
        timestamp: Utc::now(),
    }))
}

/// Clear every request counter
#[utoipa::path(
    post,
    path = "/api/metrics/reset",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Counters cleared", body = ResetResponse)
    )
)]
pub async fn reset_metrics(State(state): State<AppState>) -> Json<ResetResponse> {
    state.metrics.reset();
    tracing::info!("Request metrics reset");

    Json(ResetResponse {
        message: "Metrics reset successfully".to_string(),
        timestamp: Utc::now(),
    })
}
