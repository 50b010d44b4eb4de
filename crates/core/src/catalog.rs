//! In-memory catalog operations.
//!
//! A [`Catalog`] is the full ordered list of books and doubles as the shape
//! of the persisted document (`{ "books": [...] }`). Everything here is pure;
//! loading and saving live in the store crate.

use serde::{Deserialize, Serialize};

use crate::book::{Book, BookPatch, NewBook};
use crate::error::CoreError;
use crate::types::BookId;

const ENTITY: &str = "book";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub books: Vec<Book>,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// One more than the largest existing id, or `1` for an empty catalog.
    pub fn next_id(&self) -> Result<BookId, CoreError> {
        self.books.iter().try_fold(1, |next: BookId, book| -> Result<BookId, CoreError> {
            let candidate = book
                .id
                .checked_add(1)
                .ok_or_else(|| CoreError::Internal("book id space exhausted".into()))?;
            Ok(next.max(candidate))
        })
    }

    /// Assign the next id, append, and return a copy of the stored record.
    pub fn add(&mut self, new_book: NewBook) -> Result<Book, CoreError> {
        let book = new_book.with_id(self.next_id()?);
        self.books.push(book.clone());
        Ok(book)
    }

    pub fn update(&mut self, id: BookId, patch: BookPatch) -> Result<Book, CoreError> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        book.apply(patch);
        Ok(book.clone())
    }

    /// Remove the first record with `id`; survivors keep their relative order.
    pub fn remove(&mut self, id: BookId) -> Result<Book, CoreError> {
        let pos = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        Ok(self.books.remove(pos))
    }
}
