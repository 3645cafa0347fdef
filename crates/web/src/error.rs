use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use moodjournal_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the site's HTML error pages;
/// recoverable form errors never reach this type (handlers re-render the
/// form instead).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `moodjournal-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Fallback page bodies. Deliberately template-free so error rendering
/// cannot itself fail.
const NOT_FOUND_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Not Found</title></head><body><h1>Page not found</h1>\
<p>The page you asked for does not exist.</p>\
<p><a href=\"/\">Back to the journal</a></p></body></html>";

const SERVER_ERROR_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Server Error</title></head><body><h1>Something went wrong</h1>\
<p>An internal error occurred. Please try again.</p>\
<p><a href=\"/\">Back to the journal</a></p></body></html>";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Core(CoreError::NotFound { entity, id }) => {
                tracing::debug!(entity, id, "Not found");
                (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                tracing::debug!(reason = %msg, "Unauthorized, redirecting to login");
                axum::response::Redirect::to("/login").into_response()
            }
            AppError::Core(CoreError::Validation(msg)) => {
                // Handlers re-render forms for user mistakes; a Validation
                // error arriving here means a malformed request body.
                tracing::debug!(reason = %msg, "Invalid request");
                (StatusCode::BAD_REQUEST, Html(SERVER_ERROR_PAGE)).into_response()
            }
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
            AppError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
            AppError::Template(err) => {
                tracing::error!(error = %err, "Template rendering error");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
        }
    }
}

/// Shorthand for the owner-or-nothing 404 used by every `{id}` route.
pub fn entry_not_found(id: moodjournal_core::types::DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "entry", id })
}
