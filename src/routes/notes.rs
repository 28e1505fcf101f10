use axum::{extract::State, Form, Json};
use serde::Serialize;
use tower_sessions::Session;

use crate::db::books;
use crate::error::Result;
use crate::routes::auth::current_user_id;
use crate::routes::books::BookIdForm;
use crate::AppState;

/// Fallback text rendered when a book has no note row
pub const NO_NOTES_FALLBACK: &str = "No notes found for this book.";

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: String,
}

/// Note text for a book
///
/// Re-rendering for the same book with no intervening update returns
/// identical text each time.
pub async fn show_notes(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BookIdForm>,
) -> Result<Json<NotesResponse>> {
    current_user_id(&session, &state).await?;

    let notes = books::note_for(&state.pool, form.id()?)
        .await?
        .map(|n| n.notes)
        .unwrap_or_else(|| NO_NOTES_FALLBACK.to_string());

    Ok(Json(NotesResponse { notes }))
}
