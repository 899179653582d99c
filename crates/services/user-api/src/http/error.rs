//! Handler error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use common::AppError;

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Bare status code with an empty body
    Status(StatusCode),
    /// Store fault rendered as the standard JSON error body
    App(AppError),
}

impl ApiError {
    /// Report any fault as `status` with an empty body, logging the cause.
    pub fn collapse(status: StatusCode) -> impl Fn(AppError) -> ApiError {
        move |err| {
            tracing::warn!(status = %status, "Request failed: {}", err.cause());
            ApiError::Status(status)
        }
    }

    /// Report `NotFound` as an empty 404; other faults keep their JSON body.
    pub fn not_found_or_fault(err: AppError) -> ApiError {
        match err {
            AppError::NotFound => ApiError::Status(StatusCode::NOT_FOUND),
            other => ApiError::App(other),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Status(status) => status.into_response(),
            ApiError::App(err) => err.into_response(),
        }
    }
}
