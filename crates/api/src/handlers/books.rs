//! Handlers for the book catalog endpoints.
//!
//! Responses are the bare record or array (no envelope), matching what the
//! admin page consumes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use bookstock_core::book::{self, Book, BookInput};
use bookstock_core::error::CoreError;
use bookstock_db::repositories::BookRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /listBooks
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = BookRepo::list(&state.store).await?;
    Ok(Json(books))
}

/// POST /addBook
///
/// Requires truthy `title`, `quantity` and `description`; the id is assigned
/// by the server.
pub async fn add_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let Json(input) = payload?;
    let book = BookRepo::add(&state.store, input).await?;
    Ok(Json(book))
}

/// PATCH /updateBook
///
/// The body carries the target `id` plus any subset of mutable fields.
pub async fn update_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let Json(input) = payload?;
    let book = BookRepo::update(&state.store, input).await?;
    Ok(Json(book))
}

/// DELETE /removeBook/{id}
pub async fn remove_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Book>> {
    let id = book::parse_path_id(&raw_id)?;
    let removed = BookRepo::remove(&state.store, id).await?;
    Ok(Json(removed))
}

/// DELETE /removeBook
///
/// Same operation with the path parameter left off.
pub async fn remove_book_without_id() -> AppResult<Json<Book>> {
    Err(CoreError::missing_path_param("id", book::OP_REMOVE).into())
}
