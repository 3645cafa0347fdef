//! Session cookie extractors for Axum handlers.
//!
//! [`CurrentUser`] guards every route that requires a signed-in user; its
//! rejection is a redirect to the login page carrying a `next` parameter
//! pointing back at the originally requested URL. [`OptionalUser`] never
//! rejects and is used by public pages that adapt to the login state.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use moodjournal_core::types::DbId;
use moodjournal_db::repositories::UserRepo;
use serde::Serialize;

use crate::auth::token::validate_session_token;
use crate::state::AppState;

/// Name of the session cookie holding the signed token.
pub const SESSION_COOKIE: &str = "moodjournal_session";

/// The signed-in user, extracted from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Html<String>> {
///     tracing::info!(user_id = user.id, "handling request");
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    /// The user's internal database id (from the token's `sub` claim).
    pub id: DbId,
    pub username: String,
}

/// Redirect-to-login rejection, preserving where the user was headed.
#[derive(Debug)]
pub struct LoginRedirect {
    next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&format!("/login?next={}", encode_next(&self.next))).into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let redirect = LoginRedirect { next };

        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(redirect);
        };

        let Ok(claims) = validate_session_token(cookie.value(), &state.config.session) else {
            return Err(redirect);
        };

        // The account may have been removed since the token was issued.
        let user = match UserRepo::find_by_id(&state.pool, claims.sub).await {
            Ok(Some(user)) => user,
            _ => return Err(redirect),
        };

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
        })
    }
}

/// Login state for public pages: `Some` when a valid session cookie is
/// present, `None` otherwise. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(
            CurrentUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

/// Build the session cookie for a freshly issued token. HttpOnly and
/// SameSite=Lax; expiry is enforced by the token's `exp` claim.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Removal cookie for logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Percent-encode the characters that would change how the `next` value is
/// parsed out of the login URL's query string. Plain paths pass through
/// unchanged.
fn encode_next(next: &str) -> String {
    next.replace('%', "%25")
        .replace('&', "%26")
        .replace('?', "%3F")
        .replace('#', "%23")
}

/// Only same-site relative paths are honored as post-login targets.
pub fn sanitize_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
}
