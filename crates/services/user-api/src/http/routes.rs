//! Route configuration.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::http::handlers::{connection_routes, health_routes, metrics_routes, user_routes};
use crate::http::middleware::metrics_middleware;
use crate::http::openapi::ApiDoc;
use crate::http::AppState;

/// Base path of every API route
pub const API_BASE_PATH: &str = "/api";

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness check
        .merge(health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(API_BASE_PATH, api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes mounted under the API base path.
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(connection_routes())
        .merge(health_routes())
        .merge(metrics_routes())
        .nest("/users", user_routes())
}
