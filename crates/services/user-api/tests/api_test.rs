//! Integration tests for API endpoints.
//!
//! These tests drive the real router against an in-memory SQLite database,
//! so every request goes through the repository and the migrations.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::DbErr;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::DatabaseConfig;
use user_api_lib::http::{create_router, AppState};
use user_api_lib::infra::{ConnectivityProbe, Database, DatabaseInfo};

// =============================================================================
// Test Helpers
// =============================================================================

async fn test_database() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // One connection keeps every query on the same in-memory database
        max_connections: 1,
        min_connections: 1,
        acquire_timeout_seconds: 5,
    };
    Database::connect(&config).await.unwrap()
}

async fn test_app() -> Router {
    create_router(AppState::from_database(test_database().await))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, bytes.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

async fn create(app: &Router, name: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({ "name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json_body(&body)
}

fn names(users: &Value) -> Vec<String> {
    let mut names: Vec<String> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

/// Stands in for a database that refuses every connection
struct UnreachableDatabase;

#[async_trait]
impl ConnectivityProbe for UnreachableDatabase {
    async fn probe(&self) -> Result<DatabaseInfo, DbErr> {
        Err(DbErr::Custom("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), DbErr> {
        Err(DbErr::Custom("connection refused".to_string()))
    }
}

/// App over a live database, plus a handle for closing its pool
async fn test_app_with_database() -> (Router, Database) {
    let database = test_database().await;
    let app = create_router(AppState::from_database(database.clone()));
    (app, database)
}

// =============================================================================
// User Lifecycle
// =============================================================================

#[tokio::test]
async fn test_create_get_delete_lifecycle() {
    let app = test_app().await;

    let created = create(&app, "Alice", "alice@x.com").await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Alice");
    assert_eq!(created["email"], "alice@x.com");

    let (status, body) = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched = json_body(&body);
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["name"], "Alice");
    assert_eq!(fetched["email"], "alice@x.com");

    let (status, body) = send(&app, "DELETE", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_repeated_delete_returns_not_found() {
    let app = test_app().await;
    let id = create(&app, "Bob", "bob@x.com").await["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_unknown_id_is_not_found_everywhere() {
    let app = test_app().await;
    let update = json!({ "name": "Ghost", "email": "ghost@x.com" });

    let (status, body) = send(&app, "GET", "/api/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (status, body) = send(&app, "PUT", "/api/users/999", Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (status, body) = send(&app, "DELETE", "/api/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "id": 4242, "name": "Carol", "email": "carol@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(json_body(&body)["id"], 4242);
}

// =============================================================================
// Create Failures
// =============================================================================

#[tokio::test]
async fn test_create_duplicate_email_is_bad_request() {
    let app = test_app().await;
    create(&app, "Alice", "alice@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "name": "Alice Again", "email": "alice@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_create_invalid_payloads_are_bad_request() {
    let app = test_app().await;

    for payload in [
        json!({ "name": "", "email": "empty@x.com" }),
        json!({ "name": "   ", "email": "blank@x.com" }),
        json!({ "name": "No Email", "email": "not-an-email" }),
        json!({ "name": "Missing Email" }),
    ] {
        let (status, body) = send(&app, "POST", "/api/users", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.is_empty());
    }

    let (_, body) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(json_body(&body), json!([]));
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn test_list_returns_every_user() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));

    create(&app, "Alice", "alice@x.com").await;
    create(&app, "Bob", "bob@x.com").await;
    create(&app, "Carol", "carol@x.com").await;

    let (status, body) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json_body(&body)), vec!["Alice", "Bob", "Carol"]);
}

#[tokio::test]
async fn test_get_by_email() {
    let app = test_app().await;
    let created = create(&app, "Dave", "dave@x.com").await;

    let (status, body) = send(&app, "GET", "/api/users/email/dave@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["id"], created["id"]);

    let (status, body) = send(&app, "GET", "/api/users/email/nobody@x.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_search_by_name_substring() {
    let app = test_app().await;
    create(&app, "Alice Smith", "alice@x.com").await;
    create(&app, "Bob Smith", "bob@x.com").await;
    create(&app, "Carol Jones", "carol@x.com").await;

    let (status, body) = send(&app, "GET", "/api/users/search?name=Smith", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json_body(&body)), vec!["Alice Smith", "Bob Smith"]);

    let (status, body) = send(&app, "GET", "/api/users/search?name=Zed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn test_search_with_empty_name_matches_all() {
    let app = test_app().await;
    create(&app, "Alice", "alice@x.com").await;
    create(&app, "Bob", "bob@x.com").await;

    let (status, body) = send(&app, "GET", "/api/users/search?name=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json_body(&body)), vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = test_app().await;
    create(&app, "Alice", "alice@x.com").await;
    create(&app, "Bob", "bob@x.com").await;
    create(&app, "100% Real", "real@x.com").await;
    create(&app, "snake_case", "snake@x.com").await;

    let (status, body) = send(&app, "GET", "/api/users/search?name=%25", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json_body(&body)), vec!["100% Real"]);

    let (status, body) = send(&app, "GET", "/api/users/search?name=_", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json_body(&body)), vec!["snake_case"]);

    let (status, body) = send(&app, "GET", "/api/users/search?name=e_c", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json_body(&body)), vec!["snake_case"]);

    let (status, body) = send(&app, "GET", "/api/users/search?name=A%25e", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn test_search_without_name_is_bad_request() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/users/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_id() {
    let app = test_app().await;
    let id = create(&app, "Alice", "alice@x.com").await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(json!({ "name": "Alicia", "email": "alicia@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = json_body(&body);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "Alicia");
    assert_eq!(updated["email"], "alicia@x.com");

    let (_, body) = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    let fetched = json_body(&body);
    assert_eq!(fetched["name"], "Alicia");
    assert_eq!(fetched["email"], "alicia@x.com");

    let (status, _) = send(&app, "GET", "/api/users/email/alice@x.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_taken_email_is_rejected() {
    let app = test_app().await;
    create(&app, "Alice", "alice@x.com").await;
    let bob = create(&app, "Bob", "bob@x.com").await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", bob),
        Some(json!({ "name": "Bob", "email": "alice@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (_, body) = send(&app, "GET", &format!("/api/users/{}", bob), None).await;
    assert_eq!(json_body(&body)["email"], "bob@x.com");
}

#[tokio::test]
async fn test_update_rule_violation_on_unknown_id_is_not_found() {
    let app = test_app().await;

    for payload in [
        json!({ "name": "", "email": "x@x.com" }),
        json!({ "name": "X", "email": "not-an-email" }),
    ] {
        let (status, body) = send(&app, "PUT", "/api/users/999", Some(payload)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn test_update_rule_violation_leaves_user_unchanged() {
    let app = test_app().await;
    let id = create(&app, "Alice", "alice@x.com").await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(json!({ "name": "   ", "email": "alice@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (_, body) = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(json_body(&body)["name"], "Alice");
}

#[tokio::test]
async fn test_update_malformed_payload_is_bad_request() {
    let app = test_app().await;
    let id = create(&app, "Alice", "alice@x.com").await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(json!({ "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

// =============================================================================
// Connectivity Check
// =============================================================================

#[tokio::test]
async fn test_connection_reports_sqlite() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/test-connection", None).await;
    assert_eq!(status, StatusCode::OK);

    let json = json_body(&body);
    assert_eq!(json["status"], "SUCCESS");
    assert_eq!(json["database"], "SQLite");
    assert!(!json["version"].as_str().unwrap().is_empty());
    assert!(json["message"].as_str().unwrap().contains("SQLite"));
}

#[tokio::test]
async fn test_connection_check_releases_connection() {
    // With a single pooled connection, a leaked connection would make the
    // following user request time out.
    let app = test_app().await;

    for _ in 0..3 {
        let (status, _) = send(&app, "GET", "/api/test-connection", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_connection_closed_pool_reports_error() {
    let (app, database) = test_app_with_database().await;
    database.get_connection().close().await.unwrap();

    let (status, body) = send(&app, "GET", "/api/test-connection", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(&body);
    assert_eq!(json["status"], "ERROR");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to connect to the database: "));
    assert!(json.get("database").is_none());
}

#[tokio::test]
async fn test_connection_unreachable_store() {
    let database = test_database().await;
    let users = AppState::from_database(database).users;
    let app = create_router(AppState::new(users, Arc::new(UnreachableDatabase)));

    let (status, body) = send(&app, "GET", "/api/test-connection", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(&body);
    assert_eq!(json["status"], "ERROR");
    assert!(json["message"].as_str().unwrap().contains("connection refused"));
}

// =============================================================================
// Health and Metrics
// =============================================================================

#[tokio::test]
async fn test_health_reports_connected_database() {
    let app = test_app().await;

    for path in ["/health", "/api/health"] {
        let (status, body) = send(&app, "GET", path, None).await;
        assert_eq!(status, StatusCode::OK);

        let json = json_body(&body);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "connected");
        assert!(json["uptime"].as_str().unwrap().ends_with('s'));
        assert!(json["uptime_seconds"].is_u64());
    }
}

#[tokio::test]
async fn test_health_closed_pool_is_unavailable() {
    let (app, database) = test_app_with_database().await;
    database.get_connection().close().await.unwrap();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(&body);
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"], "disconnected");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_metrics_count_requests_by_route() {
    let app = test_app().await;
    let id = create(&app, "Alice", "alice@x.com").await["id"].as_i64().unwrap();
    send(&app, "GET", &format!("/api/users/{}", id), None).await;
    send(&app, "GET", "/api/users/999", None).await;

    let (status, body) = send(&app, "GET", "/api/metrics", None).await;
    assert_eq!(status, StatusCode::OK);

    let json = json_body(&body);
    assert_eq!(json["server"]["total_requests"], 3);
    assert_eq!(json["server"]["error_count"], 1);
    assert_eq!(json["database"]["total_users"], 1);

    let by_id = json["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["endpoint"] == "GET /api/users/:id")
        .unwrap();
    assert_eq!(by_id["count"], 2);
    assert_eq!(by_id["errors"], 1);
}

#[tokio::test]
async fn test_metrics_reset_clears_counters() {
    let app = test_app().await;
    send(&app, "GET", "/api/users", None).await;

    let (status, body) = send(&app, "POST", "/api/metrics/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["message"], "Metrics reset successfully");

    // The reset request itself is recorded after the counters are cleared
    let (_, body) = send(&app, "GET", "/api/metrics", None).await;
    let json = json_body(&body);
    assert_eq!(json["server"]["total_requests"], 1);
    assert_eq!(json["endpoints"][0]["endpoint"], "POST /api/metrics/reset");
}

// =============================================================================
// Documentation
// =============================================================================

#[tokio::test]
async fn test_openapi_document_served() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json_body(&body)["paths"]["/api/users"].is_object());
}
