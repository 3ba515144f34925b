//! The API client seam.
//!
//! The real HTTP client lives outside this layer; the sync layer only
//! needs something that can produce a JSON payload for a path, or fail.
//! Payloads are deliberately opaque `serde_json::Value`s: alert and
//! silence state in particular is server-computed and must not be
//! reinterpreted here.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced when a fetch cannot produce a payload.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response body: {0}")]
    Decode(String),
}

/// Boxed future returned by fetchers and client calls.
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Value, ApiError>> + Send>>;

/// A reusable fetch closure bound to one resource view.
pub type Fetcher = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// REST-style API client consumed by the sync layer.
///
/// Implementations return a typed payload or an error on non-2xx.
pub trait ApiClient: Send + Sync {
    fn get(&self, path: &str) -> FetchFuture;
    fn post(&self, path: &str, body: Value) -> FetchFuture;
    fn put(&self, path: &str, body: Value) -> FetchFuture;
    fn delete(&self, path: &str) -> FetchFuture;
}

/// Build a fetcher that GETs a fixed path through the given client.
pub fn get_fetcher(client: Arc<dyn ApiClient>, path: impl Into<String>) -> Fetcher {
    let path = path.into();
    Arc::new(move || client.get(&path))
}
