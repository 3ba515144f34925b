//! Error types for the resource cache.

use thiserror::Error;

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur during cache operations.
///
/// Both variants are programmer misuse rather than runtime conditions;
/// callers on the cluster-switch path must propagate them, since failing
/// to invalidate risks serving wrong-cluster data.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("no cache entry for key: {0}")]
    UnknownKey(String),

    #[error("unregistered query-key root: {0}")]
    UnregisteredRoot(String),
}
