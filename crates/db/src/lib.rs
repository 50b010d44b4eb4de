//! Flat-file persistence for the book catalog.

pub mod error;
pub mod repositories;
pub mod store;

pub use error::{RepoError, StoreError};
pub use store::BookStore;

/// Open the catalog document at `path`, creating an empty one if missing.
pub async fn open_store(
    path: impl Into<std::path::PathBuf>,
    serialize_writes: bool,
) -> Result<BookStore, StoreError> {
    let store = BookStore::new(path, serialize_writes);
    store.init_if_missing().await?;
    Ok(store)
}

/// Verify the catalog document can be read and parsed.
pub async fn health_check(store: &BookStore) -> Result<(), StoreError> {
    store.load().await.map(|_| ())
}
