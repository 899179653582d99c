//! Request middleware.

mod metrics;

pub use metrics::{
    format_uptime, metrics_middleware, EndpointMetrics, RequestMetrics, ServerMetrics,
};
