//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use common::AppResult;
use domain::{CreateUser, UpdateUser, User, UserId};

use crate::http::extractors::JsonBody;
use crate::http::{ApiError, AppState};

/// Name search query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring to look for in user names
    pub name: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/search", get(search_users))
        .route("/email/:email", get(get_user_by_email))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid payload or rejected by the store")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state
        .users
        .create_user(payload)
        .await
        .map_err(ApiError::collapse(StatusCode::BAD_REQUEST))?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .get_user(id)
        .await
        .map_err(ApiError::not_found_or_fault)?;

    Ok(Json(user))
}

/// Get user by email address
#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "Exact email address")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .get_user_by_email(&email)
        .await
        .map_err(ApiError::not_found_or_fault)?;

    Ok(Json(user))
}

/// Search users by name substring
#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = "Users",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users", body = Vec<User>)
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.users.search_users(&params.name).await?;
    Ok(Json(users))
}

/// Replace a user's name and email
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Undecodable payload"),
        (status = 404, description = "User not found or update rejected")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    JsonBody(payload): JsonBody<UpdateUser>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .update_user(id, payload)
        .await
        .map_err(ApiError::collapse(StatusCode::NOT_FOUND))?;

    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .delete_user(id)
        .await
        .map_err(ApiError::collapse(StatusCode::NOT_FOUND))?;

    Ok(StatusCode::NO_CONTENT)
}
