//! Liveness endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Confirms the server is up and the database answers.
pub async fn health(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    moodjournal_db::health_check(&state.pool).await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
