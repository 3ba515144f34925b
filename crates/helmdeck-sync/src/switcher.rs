//! Cluster switching.

use helmdeck_cache::ResourceCache;
use helmdeck_core::SettingsStore;
use tracing::info;

use crate::error::{SyncError, SyncResult};
use crate::invalidator::{InvalidationReport, invalidate_cluster_scope};

/// Commits cluster switches and keeps the cache consistent across them.
#[derive(Clone)]
pub struct ClusterSwitcher {
    settings: SettingsStore,
    cache: ResourceCache,
}

impl ClusterSwitcher {
    pub fn new(settings: SettingsStore, cache: ResourceCache) -> Self {
        Self { settings, cache }
    }

    /// Switch to the named cluster.
    ///
    /// Commits the new context to the shared settings, then sweeps every
    /// cluster-scoped entry before any view under the new context reads
    /// cached data from the old one. A failed sweep is fatal to the
    /// switch: the error propagates so the caller surfaces it instead of
    /// rendering views with unknown invalidation state.
    pub async fn switch(&self, cluster: &str) -> SyncResult<InvalidationReport> {
        if cluster.trim().is_empty() {
            return Err(SyncError::EmptyClusterName);
        }

        let previous = self.settings.current_cluster();
        self.settings.set_current_cluster(cluster);
        info!(from = %previous, to = %cluster, "cluster switched");

        invalidate_cluster_scope(&self.cache).await
    }
}
