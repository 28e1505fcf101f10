//! User queries. Users are only ever inserted and read.

use sqlx::PgPool;

use crate::error::{map_unique_violation, AppError, Result};
use crate::models::User;

/// List all users, oldest first
pub async fn list(pool: &PgPool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Fetch a user by id
pub async fn find(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a user from a submitted name
///
/// A duplicate name surfaces as [`AppError::DuplicateUser`].
pub async fn create(pool: &PgPool, name: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name) VALUES ($1) RETURNING *",
    )
    .bind(name.trim())
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, AppError::DuplicateUser))?;

    tracing::info!("Created user {} ({})", user.id, user.name);
    Ok(user)
}

/// Fetch a user by external Google identity
pub async fn find_by_google_id(pool: &PgPool, google_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = $1")
        .bind(google_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// How many disambiguated names to try before giving up on provisioning
const MAX_NAME_ATTEMPTS: u32 = 20;

/// A unique violation on the users.name key specifically
fn is_name_conflict(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some("users_name_key");
    }
    false
}

/// Auto-provision a user from a Google profile on first login
///
/// Lookup is by `google_id` only; a second provider identity with the same
/// email creates a second, distinct user. Display names are not unique across
/// identities, so a collision with an existing row retries with a numbered
/// suffix until the insert lands.
pub async fn create_from_google(
    pool: &PgPool,
    name: &str,
    email: &str,
    google_id: &str,
) -> Result<User> {
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let candidate = if attempt == 1 {
            name.to_string()
        } else {
            format!("{name} ({attempt})")
        };

        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, google_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&candidate)
        .bind(email)
        .bind(google_id)
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => {
                tracing::info!("Provisioned user {} from Google profile", user.id);
                return Ok(user);
            }
            Err(e) if is_name_conflict(&e) => {
                tracing::info!("Name {:?} is taken, retrying with a suffix", candidate);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::InvalidInput(
        "Could not find a free display name for this account".to_string(),
    ))
}
