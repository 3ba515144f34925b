//! The resource cache and view subscriptions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use helmdeck_core::{Fetcher, QueryKey, keys};
use tokio::sync::{RwLock, watch};
use tracing::debug;

use crate::entry::{EntrySnapshot, EntryState};
use crate::error::{CacheError, CacheResult};

/// How long an entry survives after its last subscriber unsubscribes.
/// Long enough for a remount during navigation to reuse the entry.
const DEFAULT_GC_GRACE: Duration = Duration::from_secs(5);

/// Reactive cache keyed by registry query keys.
///
/// `Clone` + `Send` + `Sync`; clones share the same entries.
#[derive(Clone)]
pub struct ResourceCache {
    entries: Arc<RwLock<HashMap<QueryKey, Arc<EntryState>>>>,
    gc_grace: Duration,
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::with_gc_grace(DEFAULT_GC_GRACE)
    }

    pub fn with_gc_grace(gc_grace: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            gc_grace,
        }
    }

    /// Register interest in a key, creating its entry on first use.
    ///
    /// New entries start idle and stale, so the first read fetches. If the
    /// entry already exists the given fetcher is ignored; the registry
    /// guarantees identical keys mean the same resource view.
    pub async fn subscribe(&self, key: QueryKey, fetcher: Fetcher) -> QuerySubscription {
        let entry = {
            let mut entries = self.entries.write().await;
            entries
                .entry(key.clone())
                .or_insert_with(|| {
                    debug!(%key, "cache entry created");
                    EntryState::new(key.clone(), fetcher)
                })
                .clone()
        };
        entry.add_subscriber();
        QuerySubscription {
            cache: self.clone(),
            key,
            rx: entry.watch(),
            entry,
        }
    }

    /// Read a key, fetching first if the entry is stale or empty.
    pub async fn read(&self, key: &QueryKey) -> CacheResult<EntrySnapshot> {
        let entry = self
            .get(key)
            .await
            .ok_or_else(|| CacheError::UnknownKey(key.to_string()))?;
        Ok(entry.ensure_fresh().await)
    }

    /// Fetch a key unconditionally (scheduler tick).
    pub async fn refresh(&self, key: &QueryKey) -> CacheResult<EntrySnapshot> {
        let entry = self
            .get(key)
            .await
            .ok_or_else(|| CacheError::UnknownKey(key.to_string()))?;
        Ok(entry.force_refresh().await)
    }

    /// Current snapshot without triggering a fetch.
    pub async fn peek(&self, key: &QueryKey) -> Option<EntrySnapshot> {
        Some(self.get(key).await?.snapshot())
    }

    /// Mark every entry whose root matches stale, wildcarding params.
    ///
    /// Returns how many entries were marked. Rejects roots that are not in
    /// the registry: a mistyped root would silently sweep nothing, which on
    /// the cluster-switch path means serving wrong-cluster data.
    pub async fn invalidate_root(&self, root: &str) -> CacheResult<usize> {
        if !keys::is_registered(root) {
            return Err(CacheError::UnregisteredRoot(root.to_string()));
        }
        let entries = self.entries.read().await;
        let mut marked = 0;
        for (key, entry) in entries.iter() {
            if key.root() == root {
                entry.mark_stale();
                marked += 1;
            }
        }
        if marked > 0 {
            debug!(root, marked, "entries marked stale");
        }
        Ok(marked)
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn get(&self, key: &QueryKey) -> Option<Arc<EntryState>> {
        self.entries.read().await.get(key).cloned()
    }

    fn schedule_gc(&self, key: QueryKey) {
        // Outside a runtime (teardown paths) the entry just lingers; the
        // cache itself is being dropped anyway.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let cache = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(cache.gc_grace).await;
                cache.gc(&key).await;
            });
        }
    }

    async fn gc(&self, key: &QueryKey) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            // A remount during the grace period keeps the entry alive.
            if entry.subscriber_count() == 0 {
                entries.remove(key);
                debug!(%key, "cache entry collected");
            }
        }
    }
}

/// A view's handle on one cache entry.
///
/// Dropping the subscription releases the entry; once the last one for a
/// key is gone the entry is collected after a grace period.
pub struct QuerySubscription {
    cache: ResourceCache,
    key: QueryKey,
    rx: watch::Receiver<EntrySnapshot>,
    entry: Arc<EntryState>,
}

impl QuerySubscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Latest snapshot observed on the watch channel.
    pub fn snapshot(&self) -> EntrySnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot change. Returns `false` if the entry
    /// was collected.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        if self.entry.remove_subscriber() == 0 {
            self.cache.schedule_gc(self.key.clone());
        }
    }
}
