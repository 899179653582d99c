//! HTTP request handlers.

pub mod connection_handler;
pub mod health_handler;
pub mod metrics_handler;
pub mod user_handler;

pub use connection_handler::connection_routes;
pub use health_handler::health_routes;
pub use metrics_handler::metrics_routes;
pub use user_handler::user_routes;
