//! HTTP-level tests for the public landing page and liveness endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_text, get};
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn home_is_public(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Welcome to MoodJournal"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn home_shows_a_quote_when_quotes_exist(pool: SqlitePool) {
    // The seed migration loads the quote collection.
    let app = common::build_test_app(pool);
    let body = body_text(get(&app, "/").await).await;
    assert!(body.contains("<blockquote"), "a quote should be rendered");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn home_shows_no_quote_when_collection_empty(pool: SqlitePool) {
    sqlx::query("DELETE FROM quotes")
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("<blockquote"));
    assert!(body.contains("No inspiration today"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn home_never_redirects_anonymous_visitors(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/").await;
    assert_ne!(response.status(), StatusCode::SEE_OTHER);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_ok(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("ok"));
}
