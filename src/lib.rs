//! Bookshelf Server Library
//!
//! This module exports the core types and the router for testing and reuse.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use config::{AuthMode, Config, GoogleConfig};
pub use db::create_pool;
pub use error::{AppError, Result};

use axum::{
    routing::{get, post},
    Router,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: Config,
}

/// Build the application router for the configured identity variant
///
/// The session layer is applied by the caller (Postgres store in production,
/// in-memory store in tests).
pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health_check))
        .route(
            "/addBook",
            get(routes::add_book_form).post(routes::add_book_form),
        )
        .route("/newBook", post(routes::new_book))
        .route("/notes", post(routes::show_notes))
        .route("/edit", post(routes::edit_book))
        .route("/updateBook", post(routes::update_book))
        .route("/delete", post(routes::delete_book));

    let app = match state.config.auth_mode {
        AuthMode::Local => app
            .route("/add", post(routes::add_user))
            .route("/changeUser", post(routes::change_user)),
        AuthMode::Google => app
            .route("/login", get(routes::login_page))
            .route("/auth/google", get(routes::google_login))
            .route("/auth/google/callback", get(routes::google_callback))
            .route("/logout", get(routes::logout)),
    };

    app.with_state(state)
}
