use std::sync::Arc;

use bookstock_db::BookStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Holds no catalog data; every request reloads the document through `store`.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the catalog document (and its writer lock).
    pub store: BookStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
