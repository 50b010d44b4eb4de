//! Route definitions for the book catalog.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::books;
use crate::state::AppState;

/// Catalog routes, mounted at the root.
///
/// ```text
/// GET    /listBooks          -> list_books
/// POST   /addBook            -> add_book
/// PATCH  /updateBook         -> update_book
/// DELETE /removeBook/{id}    -> remove_book
/// DELETE /removeBook         -> remove_book_without_id (400)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/listBooks", get(books::list_books))
        .route("/addBook", post(books::add_book))
        .route("/updateBook", patch(books::update_book))
        .route("/removeBook/{id}", delete(books::remove_book))
        .route("/removeBook", delete(books::remove_book_without_id))
}
