//! Catalog operations over a [`BookStore`](crate::store::BookStore).
//!
//! Each operation is one load-mutate-save cycle on the whole document.

mod book_repo;

pub use book_repo::BookRepo;
