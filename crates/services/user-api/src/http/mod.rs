//! HTTP layer - handlers, extractors and routes.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
