//! In-process request metrics.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::http::AppState;

/// Label for requests that matched no route
const UNMATCHED_ENDPOINT: &str = "<unmatched>";

#[derive(Debug, Default)]
struct EndpointCounters {
    count: u64,
    errors: u64,
    total_time: Duration,
}

#[derive(Debug)]
struct Counters {
    started_at: Instant,
    requests: u64,
    errors: u64,
    total_time: Duration,
    endpoints: HashMap<String, EndpointCounters>,
}

impl Counters {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            requests: 0,
            errors: 0,
            total_time: Duration::ZERO,
            endpoints: HashMap::new(),
        }
    }
}

/// Request counters since start-up or the last reset.
#[derive(Debug)]
pub struct RequestMetrics {
    state: Mutex<Counters>,
}

/// Aggregate server counters.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServerMetrics {
    pub uptime_seconds: u64,
    #[schema(example = "0d 1h 2m 3s")]
    pub uptime: String,
    pub total_requests: u64,
    pub error_count: u64,
    pub success_count: u64,
    /// Percentage of requests answered below 400
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
    pub requests_per_second: f64,
}

/// Counters for one `METHOD /route` pair.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EndpointMetrics {
    #[schema(example = "GET /api/users/:id")]
    pub endpoint: String,
    pub count: u64,
    pub errors: u64,
    pub avg_time_ms: f64,
    pub success_rate: f64,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Counters::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one finished request. Statuses of 400 and above count as errors.
    pub fn record(&self, method: &Method, endpoint: &str, status: StatusCode, elapsed: Duration) {
        let failed = status.as_u16() >= 400;
        let mut state = self.lock();

        state.requests += 1;
        state.total_time += elapsed;
        if failed {
            state.errors += 1;
        }

        let stats = state
            .endpoints
            .entry(format!("{} {}", method, endpoint))
            .or_default();
        stats.count += 1;
        stats.total_time += elapsed;
        if failed {
            stats.errors += 1;
        }
    }

    /// Aggregate counters.
    pub fn server(&self) -> ServerMetrics {
        let state = self.lock();
        let uptime = state.started_at.elapsed();
        let seconds = uptime.as_secs_f64();

        ServerMetrics {
            uptime_seconds: uptime.as_secs(),
            uptime: format_uptime(uptime),
            total_requests: state.requests,
            error_count: state.errors,
            success_count: state.requests - state.errors,
            success_rate: success_rate(state.requests, state.errors),
            avg_response_time_ms: average_ms(state.total_time, state.requests),
            requests_per_second: if seconds > 0.0 {
                state.requests as f64 / seconds
            } else {
                0.0
            },
        }
    }

    /// Per-endpoint counters, busiest first.
    pub fn endpoints(&self) -> Vec<EndpointMetrics> {
        let state = self.lock();
        let mut endpoints: Vec<EndpointMetrics> = state
            .endpoints
            .iter()
            .map(|(endpoint, stats)| EndpointMetrics {
                endpoint: endpoint.clone(),
                count: stats.count,
                errors: stats.errors,
                avg_time_ms: average_ms(stats.total_time, stats.count),
                success_rate: success_rate(stats.count, stats.errors),
            })
            .collect();

        endpoints.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.endpoint.cmp(&b.endpoint)));
        endpoints
    }

    /// Drop every counter and restart the uptime window.
    pub fn reset(&self) {
        *self.lock() = Counters::new();
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn success_rate(count: u64, errors: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (count - errors) as f64 * 100.0 / count as f64
}

fn average_ms(total: Duration, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total.as_secs_f64() * 1000.0 / count as f64
}

/// Render a duration as `"<d>d <h>h <m>m <s>s"`.
pub fn format_uptime(uptime: Duration) -> String {
    let seconds = uptime.as_secs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
}

/// Time every request and record it under its route template.
pub async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    state
        .metrics
        .record(&method, &endpoint, response.status(), start.elapsed());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_errors_per_endpoint() {
        let metrics = RequestMetrics::new();
        let ms = Duration::from_millis(10);

        metrics.record(&Method::GET, "/api/users/:id", StatusCode::OK, ms);
        metrics.record(&Method::GET, "/api/users/:id", StatusCode::NOT_FOUND, ms);
        metrics.record(&Method::POST, "/api/users", StatusCode::CREATED, ms);

        let server = metrics.server();
        assert_eq!(server.total_requests, 3);
        assert_eq!(server.error_count, 1);
        assert_eq!(server.success_count, 2);

        let endpoints = metrics.endpoints();
        assert_eq!(endpoints[0].endpoint, "GET /api/users/:id");
        assert_eq!(endpoints[0].count, 2);
        assert_eq!(endpoints[0].errors, 1);
        assert_eq!(endpoints[0].success_rate, 50.0);
        assert_eq!(endpoints[1].endpoint, "POST /api/users");
    }

    #[test]
    fn test_reset_clears_counters() {
        let metrics = RequestMetrics::new();
        metrics.record(&Method::GET, "/health", StatusCode::OK, Duration::from_millis(1));

        metrics.reset();

        assert_eq!(metrics.server().total_requests, 0);
        assert!(metrics.endpoints().is_empty());
    }

    #[test]
    fn test_empty_metrics_have_zero_rates() {
        let server = RequestMetrics::new().server();
        assert_eq!(server.success_rate, 0.0);
        assert_eq!(server.avg_response_time_ms, 0.0);
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 0h 0m 0s");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 1h 1m 1s");
    }
}
