use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("A user with that name already exists")]
    DuplicateUser,

    #[error("User not found")]
    UserNotFound,

    #[error("Book not found")]
    BookNotFound,

    #[error("You do not own this book")]
    Forbidden,

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Session(ref e) => {
                tracing::error!("Session error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::OAuth(ref e) => {
                tracing::error!("OAuth error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Login failed")
            }
            AppError::DuplicateUser => (
                StatusCode::CONFLICT,
                "A user with that name already exists",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AppError::BookNotFound => (StatusCode::NOT_FOUND, "Book not found"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "You do not own this book"),
            // The login gate redirects rather than erroring
            AppError::Unauthenticated => return Redirect::to("/login").into_response(),
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Check whether a sqlx error is a Postgres unique violation (23505)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().as_deref() == Some("23505");
    }
    false
}

/// Map a sqlx unique-violation to the given error, pass others through
pub fn map_unique_violation(err: sqlx::Error, on_conflict: AppError) -> AppError {
    if is_unique_violation(&err) {
        on_conflict
    } else {
        AppError::Database(err)
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
