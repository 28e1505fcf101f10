use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower_sessions::Session;

use crate::config::AuthMode;
use crate::db::{books, users};
use crate::error::Result;
use crate::models::{Book, BookWithOwner, User};
use crate::routes::auth::{current_user, current_user_id};
use crate::AppState;

/// Home view-model, local variant: all users plus the active user's books
#[derive(Debug, Serialize)]
pub struct LocalHomeResponse {
    #[serde(rename = "activeUserId")]
    pub active_user_id: i32,
    pub users: Vec<User>,
    pub books: Vec<Book>,
}

/// Home view-model, google variant: the session user plus the shared list
#[derive(Debug, Serialize)]
pub struct SharedHomeResponse {
    pub user: User,
    pub books: Vec<BookWithOwner>,
}

/// Home page
///
/// Local variant lists every user and the active user's books, exposing the
/// active id to the view. Google variant lists all books with owner names.
pub async fn home(State(state): State<AppState>, session: Session) -> Result<Response> {
    match state.config.auth_mode {
        AuthMode::Local => {
            let active_user_id = current_user_id(&session, &state).await?;
            let users = users::list(&state.pool).await?;
            let books = books::for_user(&state.pool, active_user_id).await?;

            Ok(Json(LocalHomeResponse {
                active_user_id,
                users,
                books,
            })
            .into_response())
        }
        AuthMode::Google => {
            let user = current_user(&session, &state).await?;
            let books = books::list_with_owners(&state.pool).await?;

            Ok(Json(SharedHomeResponse { user, books }).into_response())
        }
    }
}
