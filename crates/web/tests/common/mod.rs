//! Shared harness for HTTP-level integration tests.
//!
//! Builds the same router (middleware stack included) that `main.rs`
//! serves, and provides small request/response helpers so tests read as
//! browser interactions.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceExt;

use moodjournal_db::models::user::{CreateUser, User};
use moodjournal_db::repositories::UserRepo;
use moodjournal_web::auth::password::hash_password;
use moodjournal_web::auth::session::SESSION_COOKIE;
use moodjournal_web::auth::token::SessionConfig;
use moodjournal_web::config::ServerConfig;
use moodjournal_web::router::build_app_router;
use moodjournal_web::state::AppState;
use moodjournal_web::templates::build_templates;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        session: SessionConfig {
            secret: "test-session-secret".to_string(),
            expiry_hours: 24,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Mirrors the router construction in `main.rs`.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        templates: Arc::new(build_templates()),
    };
    build_app_router(state, &config)
}

/// Create a user directly in the database with [`TEST_PASSWORD`].
pub async fn create_user(pool: &SqlitePool, username: &str) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: hashed,
        },
    )
    .await
    .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, path: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should run")
}

pub async fn get_auth(app: &Router, path: &str, cookies: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header(COOKIE, cookies)
        .body(Body::empty())
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should run")
}

pub async fn post_form(app: &Router, path: &str, body: String) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should run")
}

pub async fn post_form_auth(app: &Router, path: &str, cookies: &str, body: String) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(COOKIE, cookies)
        .body(Body::from(body))
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should run")
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get("location")
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Extract a `name=value` cookie pair from the response's Set-Cookie
/// headers, ignoring attributes.
pub fn cookie_pair(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")) && !v.starts_with(&format!("{name}=;")))
        .map(|v| v.split(';').next().unwrap().to_string())
}

/// The full Set-Cookie header for a named cookie, attributes included.
pub fn set_cookie_header(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
        .map(|v| v.to_string())
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// Log in through the real endpoint and return the session cookie pair.
pub async fn login(app: &Router, username: &str) -> String {
    let body = form_encode(&[("username", username), ("password", TEST_PASSWORD)]);
    let response = post_form(app, "/login", body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");
    cookie_pair(&response, SESSION_COOKIE).expect("login should set the session cookie")
}

/// Minimal form-urlencoding: enough for the characters the tests use.
pub fn form_encode(pairs: &[(&str, &str)]) -> String {
    fn enc(value: &str) -> String {
        value
            .replace('%', "%25")
            .replace('&', "%26")
            .replace('+', "%2B")
            .replace('=', "%3D")
            .replace('#', "%23")
            .replace(' ', "+")
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", enc(k), enc(v)))
        .collect::<Vec<_>>()
        .join("&")
}
