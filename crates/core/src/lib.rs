//! Domain types and catalog logic for the book inventory service.
//!
//! Nothing in this crate touches the filesystem or the network.

pub mod book;
pub mod catalog;
pub mod error;
pub mod types;
