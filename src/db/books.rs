//! Book and note queries.
//!
//! Every book has exactly one note row, created unconditionally at
//! book-creation time. The two-table writes (create, update, delete) each run
//! inside a single transaction so a failure between the statements cannot
//! leave a book without its note.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Book, BookForm, BookWithOwner, Note};

/// List one user's books, newest first
pub async fn for_user(pool: &PgPool, user_id: i32) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM books_studied WHERE user_id = $1 ORDER BY id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// List all books joined with their owners' names, newest first
pub async fn list_with_owners(pool: &PgPool) -> Result<Vec<BookWithOwner>> {
    let books = sqlx::query_as::<_, BookWithOwner>(
        "SELECT b.*, u.name AS owner_name
         FROM books_studied b
         JOIN users u ON u.id = b.user_id
         ORDER BY b.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// Fetch a book by id
pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books_studied WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(book)
}

/// Fetch the note attached to a book
pub async fn note_for(pool: &PgPool, book_id: i32) -> Result<Option<Note>> {
    let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE book_id = $1")
        .bind(book_id)
        .fetch_optional(pool)
        .await?;
    Ok(note)
}

/// Insert a book and its note in one transaction, returning the new book id
pub async fn create_with_note(pool: &PgPool, user_id: i32, form: &BookForm) -> Result<i32> {
    let url = Book::cover_url(&form.key, &form.value);

    let mut tx = pool.begin().await?;

    let (book_id,): (i32,) = sqlx::query_as(
        "INSERT INTO books_studied (title, author, key, value, curr_date, ratings, about, user_id, url)
         VALUES ($1, $2, $3, $4, NOW(), $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(&form.title)
    .bind(&form.author)
    .bind(&form.key)
    .bind(&form.value)
    .bind(form.ratings)
    .bind(&form.about)
    .bind(user_id)
    .bind(&url)
    .fetch_one(&mut *tx)
    .await?;

    // Note row is created even when the submitted text is empty
    sqlx::query("INSERT INTO notes (notes, book_id) VALUES ($1, $2)")
        .bind(&form.notes)
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Created book {} for user {}", book_id, user_id);
    Ok(book_id)
}

/// Update a book and its note in lockstep, in one transaction
pub async fn update_with_note(pool: &PgPool, book_id: i32, form: &BookForm) -> Result<()> {
    let url = Book::cover_url(&form.key, &form.value);

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE books_studied
         SET title = $1, author = $2, about = $3, ratings = $4, key = $5,
             value = $6, url = $7, curr_date = NOW()
         WHERE id = $8",
    )
    .bind(&form.title)
    .bind(&form.author)
    .bind(&form.about)
    .bind(form.ratings)
    .bind(&form.key)
    .bind(&form.value)
    .bind(&url)
    .bind(book_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE notes SET notes = $1 WHERE book_id = $2")
        .bind(&form.notes)
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Updated book {}", book_id);
    Ok(())
}

/// Delete a book and its note in one transaction, note first
pub async fn delete_with_note(pool: &PgPool, book_id: i32) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM notes WHERE book_id = $1")
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM books_studied WHERE id = $1")
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Deleted book {}", book_id);
    Ok(())
}
