//! Book CRUD: add-form view-model, create, edit prefill, update, delete.
//!
//! Mutating and prefill routes verify the record's owner against the acting
//! user and answer 403 on mismatch. The two-table writes run in transactions
//! (see [`crate::db::books`]).

use axum::{extract::State, response::Redirect, Form, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::db::books;
use crate::error::{AppError, Result};
use crate::models::{Book, BookForm, UpdateBookForm};
use crate::routes::auth::current_user_id;
use crate::AppState;

/// A submitted book id, parsed explicitly so a malformed value is a 400
#[derive(Debug, Deserialize)]
pub struct BookIdForm {
    pub book_id: String,
}

impl BookIdForm {
    pub fn id(&self) -> Result<i32> {
        self.book_id
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidInput("Invalid book id".to_string()))
    }
}

/// Edit-form prefill: the book's fields plus its note text
#[derive(Debug, Serialize)]
pub struct EditView {
    #[serde(flatten)]
    pub book: Book,
    pub notes: String,
}

/// Add/edit form view-model; `edit` is absent for a blank form
#[derive(Debug, Serialize)]
pub struct BookFormView {
    pub edit: Option<EditView>,
}

fn ensure_owner(book: &Book, user_id: i32) -> Result<()> {
    if book.user_id != user_id {
        tracing::warn!(
            "User {} attempted to modify book {} owned by {}",
            user_id,
            book.id,
            book.user_id
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

async fn find_book(state: &AppState, id: i32) -> Result<Book> {
    books::find(&state.pool, id)
        .await?
        .ok_or(AppError::BookNotFound)
}

/// Blank add-book form view-model (the form itself renders client-side)
pub async fn add_book_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<BookFormView>> {
    current_user_id(&session, &state).await?;
    Ok(Json(BookFormView { edit: None }))
}

/// Insert a book and its note for the acting user, then return home
pub async fn new_book(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BookForm>,
) -> Result<Redirect> {
    let user_id = current_user_id(&session, &state).await?;
    form.validate().map_err(AppError::InvalidInput)?;

    books::create_with_note(&state.pool, user_id, &form).await?;

    Ok(Redirect::to("/"))
}

/// Edit-form prefill; 404 if the book is missing, 403 if not the owner
pub async fn edit_book(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BookIdForm>,
) -> Result<Json<BookFormView>> {
    let user_id = current_user_id(&session, &state).await?;

    let book = find_book(&state, form.id()?).await?;
    ensure_owner(&book, user_id)?;

    let notes = books::note_for(&state.pool, book.id)
        .await?
        .map(|n| n.notes)
        .unwrap_or_default();

    Ok(Json(BookFormView {
        edit: Some(EditView { book, notes }),
    }))
}

/// Update a book and its note in lockstep, then return home
pub async fn update_book(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateBookForm>,
) -> Result<Redirect> {
    let user_id = current_user_id(&session, &state).await?;

    let (book_id, fields) = form.into_parts().map_err(AppError::InvalidInput)?;
    fields.validate().map_err(AppError::InvalidInput)?;

    let book = find_book(&state, book_id).await?;
    ensure_owner(&book, user_id)?;

    books::update_with_note(&state.pool, book_id, &fields).await?;

    Ok(Redirect::to("/"))
}

/// Delete a book and its note (note first), then return home
pub async fn delete_book(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BookIdForm>,
) -> Result<Redirect> {
    let user_id = current_user_id(&session, &state).await?;

    let book = find_book(&state, form.id()?).await?;
    ensure_owner(&book, user_id)?;

    books::delete_with_note(&state.pool, book.id).await?;

    Ok(Redirect::to("/"))
}
