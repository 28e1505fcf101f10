//! Local-variant user management: create a user and switch the active user.

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::routes::auth::set_active_user;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    #[serde(rename = "newUser")]
    pub new_user: String,
}

/// Create a user from a submitted name and make it the session's active user
///
/// A duplicate name returns 409 Conflict so the caller can tell the insert
/// did not happen.
pub async fn add_user(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddUserForm>,
) -> Result<(StatusCode, Json<User>)> {
    if !User::validate_name(&form.new_user) {
        return Err(AppError::InvalidInput(
            "User name must be non-empty and at most 100 characters".to_string(),
        ));
    }

    let user = users::create(&state.pool, &form.new_user).await?;
    set_active_user(&session, user.id).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct ChangeUserRequest {
    /// Accepted as a JSON number or a numeric string
    #[serde(rename = "userId")]
    pub user_id: serde_json::Value,
}

/// Switch the session's active user
///
/// Non-numeric ids are rejected with 400 and the active user is unchanged.
/// Unknown ids are rejected with 404 rather than trusted blindly.
pub async fn change_user(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ChangeUserRequest>,
) -> Result<StatusCode> {
    let user_id = parse_user_id(&payload.user_id)
        .ok_or_else(|| AppError::InvalidInput("Invalid user id".to_string()))?;

    if users::find(&state.pool, user_id).await?.is_none() {
        tracing::warn!("Attempt to switch to non-existent user {}", user_id);
        return Err(AppError::UserNotFound);
    }

    set_active_user(&session, user_id).await?;
    tracing::info!("Active user switched to {}", user_id);

    // Client reloads the page itself
    Ok(StatusCode::NO_CONTENT)
}

fn parse_user_id(value: &serde_json::Value) -> Option<i32> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
