//! Handlers for the `/entries/` resource: list, detail, create, edit,
//! delete, all owner-scoped via the [`CurrentUser`] guard.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use moodjournal_core::entry::{
    format_form_datetime, validate_submission, EntryInput, Mood, GRATITUDE_SLOTS,
    MOOD_RATING_CHOICES,
};
use moodjournal_core::error::CoreError;
use moodjournal_core::forms::FieldErrors;
use moodjournal_core::types::DbId;
use moodjournal_db::repositories::EntryRepo;
use serde::Deserialize;
use tera::Context;

use crate::auth::session::{CurrentUser, OptionalUser};
use crate::error::{entry_not_found, AppError, AppResult};
use crate::flash::{set_flash, take_flash, FlashLevel, FlashMessage};
use crate::state::AppState;
use crate::templates::{errors_map, page_context, render};

/// Fields the entry form template reads error messages for.
const ENTRY_FORM_FIELDS: [&str; 6] = [
    "date",
    "mood",
    "mood_rating",
    "title",
    "content",
    "gratitude_items",
];

// ---------------------------------------------------------------------------
// Query and form types
// ---------------------------------------------------------------------------

/// Query parameters for the entry listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    /// Kept raw so a non-numeric page is a 404, not a 400.
    pub page: Option<String>,
}

/// The entry form body for create and edit. Everything arrives as strings
/// and stays that way until validation; `gratitude_count` mirrors how many
/// slots the form rendered (3 on create, the item count on edit).
#[derive(Debug, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub mood_rating: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub gratitude_count: String,
    #[serde(default)]
    pub gratitude_1: String,
    #[serde(default)]
    pub gratitude_2: String,
    #[serde(default)]
    pub gratitude_3: String,
}

impl EntryForm {
    fn input(&self) -> EntryInput {
        EntryInput {
            date: self.date.clone(),
            mood: self.mood.clone(),
            mood_rating: self.mood_rating.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }

    /// The submitted slot values, as many as the form rendered.
    fn slots(&self) -> Vec<String> {
        let count = self
            .gratitude_count
            .parse::<usize>()
            .unwrap_or(GRATITUDE_SLOTS)
            .min(GRATITUDE_SLOTS);
        [&self.gratitude_1, &self.gratitude_2, &self.gratitude_3][..count]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Context helpers
// ---------------------------------------------------------------------------

fn mood_choices() -> Vec<serde_json::Value> {
    Mood::ALL
        .iter()
        .map(|m| serde_json::json!({ "value": m.as_str(), "label": m.label() }))
        .collect()
}

fn rating_choices() -> Vec<serde_json::Value> {
    MOOD_RATING_CHOICES
        .iter()
        .map(|(value, label)| serde_json::json!({ "value": value.to_string(), "label": label }))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn form_context(
    user: &CurrentUser,
    flash: Option<&FlashMessage>,
    input: &EntryInput,
    slots: &[String],
    errors: &FieldErrors,
    is_edit: bool,
    entry_id: Option<DbId>,
) -> Context {
    let mut ctx = page_context(Some(user), flash);
    ctx.insert("form", input);
    ctx.insert("errors", &errors_map(errors, &ENTRY_FORM_FIELDS));
    ctx.insert("gratitude_slots", slots);
    ctx.insert("is_edit", &is_edit);
    ctx.insert("entry_id", &entry_id);
    ctx.insert("moods", &mood_choices());
    ctx.insert("ratings", &rating_choices());
    ctx
}

fn page_not_found(page: i64) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "entries page",
        id: page,
    })
}

// ---------------------------------------------------------------------------
// List and detail
// ---------------------------------------------------------------------------

/// GET /entries/
///
/// The signed-in user's entries, newest date first, 10 per page, with an
/// optional case-insensitive search that is echoed back into the form.
pub async fn list_entries(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let search = params.search.unwrap_or_default();
    let page_number = match params.page.as_deref() {
        None => 1,
        Some(raw) => raw.parse::<i64>().map_err(|_| page_not_found(0))?,
    };

    let page = EntryRepo::list(&state.pool, user.id, &search, page_number)
        .await?
        .ok_or_else(|| page_not_found(page_number))?;

    let (jar, flash) = take_flash(jar);
    let mut ctx = page_context(Some(&user), flash.as_ref());
    ctx.insert("page", &page);
    ctx.insert("search", &search);
    Ok((jar, render(&state.templates, "entry_list.html", &ctx)?))
}

/// GET /entries/{id}/
pub async fn entry_detail(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let entry = EntryRepo::find_for_user(&state.pool, user.id, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;
    let items = EntryRepo::gratitude_items(&state.pool, entry.id).await?;

    let (jar, flash) = take_flash(jar);
    let mut ctx = page_context(Some(&user), flash.as_ref());
    ctx.insert("entry", &entry);
    ctx.insert("gratitude_items", &items);
    Ok((jar, render(&state.templates, "entry_detail.html", &ctx)?))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// GET /entries/create/
///
/// Empty form with the date prefilled to now and three blank gratitude
/// slots.
pub async fn create_form(
    user: CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let input = EntryInput {
        date: format_form_datetime(Utc::now()),
        ..EntryInput::default()
    };
    let slots = vec![String::new(); GRATITUDE_SLOTS];

    let (jar, flash) = take_flash(jar);
    let ctx = form_context(
        &user,
        flash.as_ref(),
        &input,
        &slots,
        &FieldErrors::new(),
        false,
        None,
    );
    Ok((jar, render(&state.templates, "entry_form.html", &ctx)?))
}

/// POST /entries/create/
///
/// Valid submissions persist the entry with its non-blank gratitude items
/// and redirect to the confirmation page. Invalid ones re-render the form
/// (200) with inline errors and the original input intact.
pub async fn create_entry(
    user: CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<EntryForm>,
) -> AppResult<Response> {
    match validate_submission(&form.input(), &form.slots()) {
        Ok((fields, items)) => {
            let entry = EntryRepo::create(&state.pool, user.id, &fields, &items).await?;
            tracing::info!(user_id = user.id, entry_id = entry.id, "Journal entry created");

            let jar = set_flash(
                jar,
                FlashLevel::Success,
                format!("Entry \"{}\" was created.", entry.title),
            );
            Ok((jar, Redirect::to("/entries/create/success/")).into_response())
        }
        Err(errors) => {
            let ctx = form_context(&user, None, &form.input(), &form.slots(), &errors, false, None);
            Ok(render(&state.templates, "entry_form.html", &ctx)?.into_response())
        }
    }
}

/// GET /entries/create/success/
///
/// Static confirmation page; deliberately public.
pub async fn create_success(
    user: OptionalUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let (jar, flash) = take_flash(jar);
    let ctx = page_context(user.0.as_ref(), flash.as_ref());
    Ok((jar, render(&state.templates, "create_success.html", &ctx)?))
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// GET /entries/{id}/edit/
///
/// Form prefilled from the stored entry. Only the existing gratitude items
/// are offered as slots; no extra blanks.
pub async fn edit_form(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let entry = EntryRepo::find_for_user(&state.pool, user.id, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;
    let items = EntryRepo::gratitude_items(&state.pool, entry.id).await?;

    let input = EntryInput {
        date: format_form_datetime(entry.date),
        mood: entry.mood.clone(),
        mood_rating: entry.mood_rating.to_string(),
        title: entry.title.clone(),
        content: entry.content.clone(),
    };
    let slots: Vec<String> = items.into_iter().map(|i| i.item_text).collect();

    let (jar, flash) = take_flash(jar);
    let ctx = form_context(
        &user,
        flash.as_ref(),
        &input,
        &slots,
        &FieldErrors::new(),
        true,
        Some(id),
    );
    Ok((jar, render(&state.templates, "entry_form.html", &ctx)?))
}

/// POST /entries/{id}/edit/
///
/// Same validate-then-persist-or-rerender shape as create, but the
/// submitted gratitude set replaces the stored one and success lands on
/// the detail page.
pub async fn update_entry(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    jar: CookieJar,
    Form(form): Form<EntryForm>,
) -> AppResult<Response> {
    // Ownership first, so a foreign entry is a 404 even with a bad form.
    EntryRepo::find_for_user(&state.pool, user.id, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;

    match validate_submission(&form.input(), &form.slots()) {
        Ok((fields, items)) => {
            let entry = EntryRepo::update(&state.pool, user.id, id, &fields, &items)
                .await?
                .ok_or_else(|| entry_not_found(id))?;
            tracing::info!(user_id = user.id, entry_id = entry.id, "Journal entry updated");

            let jar = set_flash(
                jar,
                FlashLevel::Success,
                format!("Entry \"{}\" was updated.", entry.title),
            );
            Ok((jar, Redirect::to(&format!("/entries/{id}/"))).into_response())
        }
        Err(errors) => {
            let ctx = form_context(
                &user,
                None,
                &form.input(),
                &form.slots(),
                &errors,
                true,
                Some(id),
            );
            Ok(render(&state.templates, "entry_form.html", &ctx)?.into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// GET /entries/{id}/delete/
pub async fn delete_confirm(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let entry = EntryRepo::find_for_user(&state.pool, user.id, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;

    let (jar, flash) = take_flash(jar);
    let mut ctx = page_context(Some(&user), flash.as_ref());
    ctx.insert("entry", &entry);
    Ok((jar, render(&state.templates, "entry_confirm_delete.html", &ctx)?))
}

/// POST /entries/{id}/delete/
///
/// Deletes the entry (gratitude items cascade) and redirects to the list.
/// A storage failure during the delete itself is reported with a flash
/// error and the same redirect instead of a 500.
pub async fn delete_entry(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let entry = EntryRepo::find_for_user(&state.pool, user.id, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;

    let jar = match EntryRepo::delete(&state.pool, user.id, id).await {
        Ok(_) => {
            tracing::info!(user_id = user.id, entry_id = id, "Journal entry deleted");
            set_flash(
                jar,
                FlashLevel::Success,
                format!("Entry \"{}\" was deleted.", entry.title),
            )
        }
        Err(err) => {
            tracing::error!(
                user_id = user.id,
                entry_id = id,
                error = %err,
                "Failed to delete journal entry"
            );
            set_flash(
                jar,
                FlashLevel::Error,
                "The entry could not be deleted. Please try again.",
            )
        }
    };

    Ok((jar, Redirect::to("/entries/")))
}
