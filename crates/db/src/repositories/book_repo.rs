use std::future::Future;

use bookstock_core::book::{Book, BookInput};
use bookstock_core::types::BookId;

use crate::error::{RepoError, StoreError};
use crate::store::BookStore;

/// Provides the list/add/update/remove operations on the book catalog.
///
/// Request payloads are validated before the document is touched, so a
/// rejected request never causes a write. Mutations hold the store's writer
/// guard (when enabled) from load through save, and run on their own task so
/// a dropped request (client disconnect, timeout) cannot stop a cycle between
/// the temp-file write and the rename.
pub struct BookRepo;

impl BookRepo {
    /// Return every book in catalog order.
    pub async fn list(store: &BookStore) -> Result<Vec<Book>, StoreError> {
        Ok(store.load().await?.books)
    }

    /// Validate `input`, assign the next id, append, and persist.
    pub async fn add(store: &BookStore, input: BookInput) -> Result<Book, RepoError> {
        let new_book = input.into_new_book()?;

        let store = store.clone();
        let book = run_to_completion(async move {
            let _guard = store.write_guard().await;
            let mut catalog = store.load().await?;
            let book = catalog.add(new_book)?;
            store.save(&catalog).await?;
            Ok::<_, RepoError>(book)
        })
        .await?;

        tracing::info!(book_id = book.id, title = %book.title, "Book added");
        Ok(book)
    }

    /// Merge the supplied fields of `input` into the book it names by `id`.
    pub async fn update(store: &BookStore, input: BookInput) -> Result<Book, RepoError> {
        let id = input.target_id()?;
        let patch = input.into_patch()?;

        let store = store.clone();
        let book = run_to_completion(async move {
            let _guard = store.write_guard().await;
            let mut catalog = store.load().await?;
            let book = catalog.update(id, patch)?;
            store.save(&catalog).await?;
            Ok::<_, RepoError>(book)
        })
        .await?;

        tracing::info!(book_id = book.id, quantity = %book.quantity, "Book updated");
        Ok(book)
    }

    /// Remove the book with `id` and return it.
    pub async fn remove(store: &BookStore, id: BookId) -> Result<Book, RepoError> {
        let store = store.clone();
        let book = run_to_completion(async move {
            let _guard = store.write_guard().await;
            let mut catalog = store.load().await?;
            let book = catalog.remove(id)?;
            store.save(&catalog).await?;
            Ok::<_, RepoError>(book)
        })
        .await?;

        tracing::info!(book_id = book.id, title = %book.title, "Book removed");
        Ok(book)
    }
}

/// Spawn `cycle` and wait for it. The spawned task keeps running if the
/// caller's future is dropped.
async fn run_to_completion<T, F>(cycle: F) -> Result<T, RepoError>
where
    F: Future<Output = Result<T, RepoError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(cycle).await?
}
