//! Public landing page.

use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use moodjournal_core::quote::pick_random;
use moodjournal_db::repositories::QuoteRepo;

use crate::auth::session::OptionalUser;
use crate::error::AppResult;
use crate::flash::take_flash;
use crate::state::AppState;
use crate::templates::{page_context, render};

/// GET /
///
/// Always 200, signed in or not. Shows one quote picked uniformly at
/// random, or none when the collection is empty.
pub async fn home(
    user: OptionalUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let quotes = QuoteRepo::list_all(&state.pool).await?;
    let quote = pick_random(&quotes, &mut rand::rng());

    let (jar, flash) = take_flash(jar);
    let mut ctx = page_context(user.0.as_ref(), flash.as_ref());
    ctx.insert("quote", &quote);
    Ok((jar, render(&state.templates, "home.html", &ctx)?))
}
