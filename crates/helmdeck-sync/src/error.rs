//! Error types for the sync layer.

use helmdeck_cache::CacheError;
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur on the cluster-switch path.
///
/// These are deliberately fatal to the operation that hit them: an
/// incomplete invalidation risks rendering data from the wrong cluster,
/// which is worse than a visible error.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cluster name must not be empty")]
    EmptyClusterName,

    #[error(transparent)]
    Cache(#[from] CacheError),
}
