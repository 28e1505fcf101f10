pub mod auth;
pub mod books;
pub mod health;
pub mod home;
pub mod notes;
pub mod users;

pub use auth::{google_callback, google_login, login_page, logout};
pub use books::{add_book_form, delete_book, edit_book, new_book, update_book};
pub use health::health_check;
pub use home::home;
pub use notes::show_notes;
pub use users::{add_user, change_user};
