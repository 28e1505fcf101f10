use serde::{Deserialize, Serialize};

/// The single note attached to a book
///
/// Created unconditionally alongside its book (even when the submitted text is
/// empty), updated in lockstep with book updates, deleted with its book.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i32,
    pub notes: String,
    pub book_id: i32,
}
