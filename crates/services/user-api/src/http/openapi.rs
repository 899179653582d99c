//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::http::handlers::connection_handler::ConnectionStatus;
use crate::http::handlers::health_handler::HealthResponse;
use crate::http::handlers::metrics_handler::{MetricsResponse, ResetResponse, StoreMetrics};
use crate::http::middleware::{EndpointMetrics, ServerMetrics};
use domain::{CreateUser, UpdateUser, User};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::http::handlers::connection_handler::test_connection,
        crate::http::handlers::health_handler::health_check,
        crate::http::handlers::metrics_handler::get_metrics,
        crate::http::handlers::metrics_handler::reset_metrics,
        crate::http::handlers::user_handler::create_user,
        crate::http::handlers::user_handler::list_users,
        crate::http::handlers::user_handler::get_user,
        crate::http::handlers::user_handler::get_user_by_email,
        crate::http::handlers::user_handler::search_users,
        crate::http::handlers::user_handler::update_user,
        crate::http::handlers::user_handler::delete_user,
    ),
    components(
        schemas(
            User,
            CreateUser,
            UpdateUser,
            ConnectionStatus,
            HealthResponse,
            MetricsResponse,
            ServerMetrics,
            EndpointMetrics,
            StoreMetrics,
            ResetResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints"),
        (name = "Diagnostics", description = "Connectivity, liveness and request metrics"),
    )
)]
pub struct ApiDoc;
