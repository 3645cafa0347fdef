//! Embedded tera templates and shared context helpers.
//!
//! Templates are compiled into the binary with `include_str!` so the server
//! and its tests run without a template directory on disk. Parsing happens
//! once at startup; a syntax error is a startup failure.

use axum::response::Html;
use tera::{Context, Tera};

use crate::auth::session::CurrentUser;
use crate::error::AppResult;
use crate::flash::FlashMessage;

/// Parse all page templates. Panics on a syntax error, which is the desired
/// behaviour at startup.
pub fn build_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("home.html", include_str!("../templates/home.html")),
        ("entry_list.html", include_str!("../templates/entry_list.html")),
        ("entry_detail.html", include_str!("../templates/entry_detail.html")),
        ("entry_form.html", include_str!("../templates/entry_form.html")),
        (
            "entry_confirm_delete.html",
            include_str!("../templates/entry_confirm_delete.html"),
        ),
        (
            "create_success.html",
            include_str!("../templates/create_success.html"),
        ),
        ("login.html", include_str!("../templates/login.html")),
        ("register.html", include_str!("../templates/register.html")),
    ])
    .expect("page templates must parse");
    tera
}

/// Base context for every rendered page: the signed-in user (or null) and
/// the pending flash message (or null).
pub fn page_context(user: Option<&CurrentUser>, flash: Option<&FlashMessage>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("current_user", &user);
    ctx.insert("flash", &flash);
    ctx
}

/// Render a template into an HTML response.
pub fn render(templates: &Tera, name: &str, ctx: &Context) -> AppResult<Html<String>> {
    Ok(Html(templates.render(name, ctx)?))
}

/// Flatten a [`FieldErrors`] into a map with every listed field present
/// (empty string when clean), so templates can test `errors.<field>`
/// without tripping over missing keys.
pub fn errors_map(errors: &moodjournal_core::forms::FieldErrors, fields: &[&str]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for field in fields {
        map.insert(
            (*field).to_string(),
            serde_json::Value::String(errors.get(field).unwrap_or_default().to_string()),
        );
    }
    serde_json::Value::Object(map)
}
