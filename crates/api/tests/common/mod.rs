#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bookstock_api::config::ServerConfig;
use bookstock_api::router::build_app_router;
use bookstock_api::state::AppState;
use bookstock_db::BookStore;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a catalog document living in its own temp directory.
///
/// Keep the struct alive for the duration of the test; dropping it removes
/// the directory.
pub struct TestApp {
    pub dir: TempDir,
    pub store: BookStore,
    pub config: ServerConfig,
}

impl TestApp {
    /// Fresh app whose catalog document contains `books`.
    pub fn with_books(books: Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, serde_json::json!({ "books": books }).to_string()).unwrap();

        let config = test_config(&path);
        let store = BookStore::new(&path, config.serialize_writes);
        Self { dir, store, config }
    }

    pub fn empty() -> Self {
        Self::with_books(serde_json::json!([]))
    }

    /// Build the router; each call yields a new instance over the same store.
    pub fn router(&self) -> Router {
        let state = AppState {
            store: self.store.clone(),
            config: Arc::new(self.config.clone()),
        };
        build_app_router(state, &self.config)
    }

    /// Raw bytes of the catalog document.
    pub fn document(&self) -> String {
        std::fs::read_to_string(self.store.path()).unwrap()
    }

    /// Parsed `books` array of the catalog document.
    pub fn persisted_books(&self) -> Vec<Value> {
        let doc: Value = serde_json::from_str(&self.document()).unwrap();
        doc["books"].as_array().cloned().unwrap()
    }
}

/// Build a test `ServerConfig` pointing at `db_path`.
pub fn test_config(db_path: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        books_db_path: db_path.to_path_buf(),
        serialize_writes: true,
        request_timeout_secs: 30,
        static_dir: "public".into(),
        static_port: 0,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Send a raw string body with a JSON content type.
pub async fn send_raw(app: Router, method: Method, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
