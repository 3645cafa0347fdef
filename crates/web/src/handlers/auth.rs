//! Handlers for signing in, signing out, and account registration.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use moodjournal_core::forms::FieldErrors;
use moodjournal_db::models::user::CreateUser;
use moodjournal_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::{clear_session_cookie, sanitize_next, session_cookie, OptionalUser};
use crate::auth::token::generate_session_token;
use crate::error::{AppError, AppResult};
use crate::flash::{set_flash, take_flash, FlashLevel};
use crate::state::AppState;
use crate::templates::{errors_map, page_context, render};

/// Maximum username length for new accounts.
const USERNAME_MAX_LEN: usize = 150;

/// Shown when the username/password pair does not check out. One message
/// for both wrong password and unknown user.
const BAD_CREDENTIALS: &str = "Your username and password didn't match. Please try again.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

/// GET /login
pub async fn login_form(
    user: OptionalUser,
    State(state): State<AppState>,
    Query(params): Query<NextParam>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let (jar, flash) = take_flash(jar);
    let mut ctx = page_context(user.0.as_ref(), flash.as_ref());
    ctx.insert("next", params.next.as_deref().unwrap_or(""));
    ctx.insert("error", "");
    ctx.insert("username", "");
    Ok((jar, render(&state.templates, "login.html", &ctx)?))
}

/// POST /login
///
/// On success, sets the session cookie and redirects to the sanitized
/// `next` target (the entry list by default). On failure, re-renders the
/// form with a single non-specific error.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let user = UserRepo::find_by_username(&state.pool, form.username.trim()).await?;

    let verified = match &user {
        Some(user) => verify_password(&form.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification error: {e}")))?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            let token = generate_session_token(user.id, &state.config.session)
                .map_err(|e| AppError::Internal(format!("Token generation error: {e}")))?;
            let jar = jar.add(session_cookie(token));

            let target = sanitize_next(Some(form.next.as_str())).unwrap_or("/entries/");
            tracing::info!(user_id = user.id, "User signed in");
            Ok((jar, Redirect::to(target)).into_response())
        }
        _ => {
            let mut ctx = page_context(None, None);
            ctx.insert("next", &form.next);
            ctx.insert("error", BAD_CREDENTIALS);
            ctx.insert("username", &form.username);
            Ok(render(&state.templates, "login.html", &ctx)?.into_response())
        }
    }
}

/// GET /logout
pub async fn logout(user: OptionalUser, jar: CookieJar) -> impl IntoResponse {
    if let Some(user) = user.0 {
        tracing::info!(user_id = user.id, "User signed out");
    }
    (jar.remove(clear_session_cookie()), Redirect::to("/"))
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

const REGISTER_FIELDS: [&str; 3] = ["username", "password", "password_confirm"];

/// GET /register
pub async fn register_form(
    user: OptionalUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let (jar, flash) = take_flash(jar);
    let mut ctx = page_context(user.0.as_ref(), flash.as_ref());
    ctx.insert("username", "");
    ctx.insert("errors", &errors_map(&FieldErrors::new(), &REGISTER_FIELDS));
    Ok((jar, render(&state.templates, "register.html", &ctx)?))
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let mut errors = FieldErrors::new();

    if username.is_empty() {
        errors.push("username", "Username is required.");
    } else if username.chars().count() > USERNAME_MAX_LEN {
        errors.push(
            "username",
            format!("Username must be at most {USERNAME_MAX_LEN} characters."),
        );
    }

    if let Err(message) = validate_password_strength(&form.password) {
        errors.push("password", message);
    }
    if form.password_confirm != form.password {
        errors.push("password_confirm", "Passwords do not match.");
    }

    if errors.is_empty() {
        let password_hash = hash_password(&form.password)
            .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;
        let input = CreateUser {
            username: username.to_string(),
            password_hash,
        };

        match UserRepo::create(&state.pool, &input).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Account created");
                let jar = set_flash(
                    jar,
                    FlashLevel::Success,
                    "Account created. You can sign in now.",
                );
                return Ok((jar, Redirect::to("/login")).into_response());
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                errors.push("username", "That username is already taken.");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let mut ctx = page_context(None, None);
    ctx.insert("username", &form.username);
    ctx.insert("errors", &errors_map(&errors, &REGISTER_FIELDS));
    Ok(render(&state.templates, "register.html", &ctx)?.into_response())
}
