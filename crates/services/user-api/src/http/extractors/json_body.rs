//! JSON body extractor with a bare 400 rejection.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;

use crate::http::ApiError;

/// JSON extractor that only decodes the payload.
///
/// Undecodable bodies (bad JSON, missing fields, wrong content type) are
/// rejected with an empty 400. Field rules are checked by the service, so
/// each route decides how a rule violation is reported.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Rejected payload: {}", e.body_text());
            ApiError::Status(StatusCode::BAD_REQUEST)
        })?;

        Ok(JsonBody(value))
    }
}
