use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A studied-book row, owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Open Library cover key kind (e.g. "OL1", "isbn")
    pub key: String,
    /// Open Library cover key value
    pub value: String,
    pub curr_date: DateTime<Utc>,
    pub ratings: i16,
    pub about: String,
    pub user_id: i32,
    /// Derived cover-image URL, recomputed on every insert and update
    pub url: String,
}

/// A book row joined with its owner's name, for the shared list view
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookWithOwner {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub key: String,
    pub value: String,
    pub curr_date: DateTime<Utc>,
    pub ratings: i16,
    pub about: String,
    pub user_id: i32,
    pub url: String,
    pub owner_name: String,
}

impl Book {
    /// Build the Open Library cover-image URL from catalog identifiers.
    /// Medium (M) size; the frontend constrains display size via CSS.
    pub fn cover_url(key: &str, value: &str) -> String {
        format!("https://covers.openlibrary.org/b/{key}/{value}-M.jpg")
    }
}

/// Submitted fields for a new book
#[derive(Debug, Clone, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub about: String,
    pub notes: String,
    pub ratings: i16,
    pub key: String,
    pub value: String,
}

impl BookForm {
    /// Validate submitted fields before any persistence call
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title must not be empty".to_string());
        }
        if !(1..=5).contains(&self.ratings) {
            return Err("Ratings must be between 1 and 5".to_string());
        }
        Ok(())
    }
}

/// Submitted fields for updating an existing book
///
/// `bookId` arrives as a form string and is parsed explicitly so a malformed
/// id surfaces as a 400 validation failure.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookForm {
    pub title: String,
    pub author: String,
    pub about: String,
    pub notes: String,
    pub ratings: i16,
    pub key: String,
    pub value: String,
    #[serde(rename = "bookId")]
    pub book_id: String,
}

impl UpdateBookForm {
    /// Split into the target book id and the plain form fields
    pub fn into_parts(self) -> Result<(i32, BookForm), String> {
        let book_id = self
            .book_id
            .trim()
            .parse()
            .map_err(|_| "Invalid book id".to_string())?;
        Ok((
            book_id,
            BookForm {
                title: self.title,
                author: self.author,
                about: self.about,
                notes: self.notes,
                ratings: self.ratings,
                key: self.key,
                value: self.value,
            },
        ))
    }
}
