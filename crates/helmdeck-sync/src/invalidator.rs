//! The cluster-scope invalidation sweep.

use futures::future::join_all;
use helmdeck_cache::ResourceCache;
use helmdeck_core::keys;
use tracing::info;

use crate::error::SyncResult;

/// Summary of one invalidation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Roots swept — always the full cluster-scoped set.
    pub roots_swept: usize,
    /// Cache entries marked stale across all roots.
    pub entries_marked: usize,
}

/// Mark every cluster-scoped cache entry stale.
///
/// Sweeps are issued concurrently per root and the call resolves once
/// every root has been applied; ordering among them is irrelevant (the
/// sweep is a set, not a sequence). Nothing is refetched eagerly: marked
/// entries reload lazily on their next read, which keeps a switch from
/// firing a request storm across the whole root set at once.
///
/// The sweep is never memoized. Switching back to a cluster just left
/// still sweeps, because the backend may have changed underneath in the
/// meantime. Errors propagate: failing to invalidate silently risks
/// serving wrong-cluster data.
pub async fn invalidate_cluster_scope(cache: &ResourceCache) -> SyncResult<InvalidationReport> {
    let sweeps = keys::cluster_scoped_roots().map(|root| cache.invalidate_root(root));
    let results = join_all(sweeps).await;

    let mut report = InvalidationReport {
        roots_swept: 0,
        entries_marked: 0,
    };
    for marked in results {
        report.entries_marked += marked?;
        report.roots_swept += 1;
    }

    info!(
        roots = report.roots_swept,
        entries = report.entries_marked,
        "cluster scope invalidated"
    );
    Ok(report)
}
