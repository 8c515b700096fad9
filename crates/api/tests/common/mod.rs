//! Common test utilities for integration tests.
//!
//! Integration tests run against a real PostgreSQL database named by the
//! `TEST_DATABASE_URL` environment variable. When the variable is not set
//! the tests skip themselves so the suite stays green on machines without
//! a database.

// Allow dead code in this module - these helpers are shared by several
// integration test binaries and not every binary uses all of them.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use fiesta_pass_api::{app::create_app, config::Config};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

/// Shared admin password baked into the test config.
pub const TEST_ADMIN_PASSWORD: &str = "test-admin-password";

/// Create a test database pool, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn try_create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    Some(pool)
}

/// Run migrations on the test database.
pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("../persistence/src/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
}

/// Remove all rows so a test starts from a clean slate.
pub async fn cleanup_all_test_data(pool: &PgPool) {
    sqlx::query("DELETE FROM registrations")
        .execute(pool)
        .await
        .expect("Failed to clean registrations");
    sqlx::query("DELETE FROM admin_sessions")
        .execute(pool)
        .await
        .expect("Failed to clean admin sessions");
    sqlx::query("DELETE FROM registration_gate")
        .execute(pool)
        .await
        .expect("Failed to clean registration gate");
}

/// Test configuration with a unique attachment directory per call.
pub fn test_config() -> Config {
    let root_dir = std::env::temp_dir()
        .join(format!("fp-test-attachments-{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    Config::load_for_test(&[("storage.root_dir", root_dir.as_str())])
        .expect("Failed to load test config")
}

/// Build the application under test.
pub fn create_test_app(config: Config, pool: PgPool) -> Router {
    create_app(config, pool)
}

/// Build a JSON request without authentication.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Build a JSON request carrying an admin session token.
pub fn json_request_with_token(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Build a bodyless request carrying an admin session token.
pub fn request_with_token(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("Failed to build request")
}

/// Build a bodyless request without authentication.
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

/// Read a response body as JSON.
pub async fn parse_response_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}

/// Read a response body as text.
pub async fn response_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body is not valid UTF-8")
}

/// Log in with the shared test password and return the session token.
pub async fn login_admin(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/admin/login",
            serde_json::json!({ "password": TEST_ADMIN_PASSWORD }),
        ))
        .await
        .expect("Login request failed");
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = parse_response_body(response).await;
    body["token"].as_str().expect("Missing token").to_string()
}

/// Submit a registration through the public intake endpoint and return the
/// response body `{registration_id, pass_id}`.
pub async fn submit_registration(app: &Router, name: &str, home_club: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/registrations",
            serde_json::json!({
                "name": name,
                "home_club": home_club,
                "designation": "President",
                "phone_number": "+977-9800000000",
                "payment_method": "cash"
            }),
        ))
        .await
        .expect("Create request failed");
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    parse_response_body(response).await
}
