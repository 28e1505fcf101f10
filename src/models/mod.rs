pub mod book;
pub mod note;
pub mod user;

pub use book::{Book, BookForm, BookWithOwner, UpdateBookForm};
pub use note::Note;
pub use user::User;
