//! View wiring: subscribe, gate, and schedule in one step.

use std::sync::Arc;

use helmdeck_cache::{CacheResult, EntrySnapshot, QuerySubscription, ResourceCache};
use helmdeck_core::{Fetcher, PollingTier, QueryKey, SettingsStore};
use helmdeck_poll::{PollHandle, PollScheduler, RefreshGate, VisibilitySignal};

use crate::error::SyncResult;
use crate::invalidator::InvalidationReport;
use crate::switcher::ClusterSwitcher;

/// One mounted view's binding: a cache subscription plus its poll.
///
/// Holding the binding keeps the entry alive and the poll running;
/// [`unbind`](ViewBinding::unbind) tears both down.
pub struct ViewBinding {
    subscription: QuerySubscription,
    poll: PollHandle,
}

impl ViewBinding {
    pub fn key(&self) -> &QueryKey {
        self.subscription.key()
    }

    /// Latest snapshot observed for this view.
    pub fn snapshot(&self) -> EntrySnapshot {
        self.subscription.snapshot()
    }

    /// Wait for the next snapshot change.
    pub async fn changed(&mut self) -> bool {
        self.subscription.changed().await
    }

    /// Cancel the poll and release the cache entry.
    pub async fn unbind(self) {
        self.poll.cancel().await;
        // The subscription drops here; the entry is collected after the
        // grace period if no other view holds it.
    }
}

/// Shared entry point the dashboard's views drive.
///
/// Owns the settings, cache, and scheduler for one application instance.
/// Cloning is cheap and clones share everything.
#[derive(Clone)]
pub struct SyncSession {
    settings: SettingsStore,
    cache: ResourceCache,
    scheduler: PollScheduler,
    visibility: Arc<dyn VisibilitySignal>,
    switcher: ClusterSwitcher,
}

impl SyncSession {
    pub fn new(
        settings: SettingsStore,
        cache: ResourceCache,
        visibility: Arc<dyn VisibilitySignal>,
    ) -> Self {
        let scheduler = PollScheduler::new(cache.clone());
        let switcher = ClusterSwitcher::new(settings.clone(), cache.clone());
        Self {
            settings,
            cache,
            scheduler,
            visibility,
            switcher,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Mount a view: register its cache entry and start its gated poll.
    ///
    /// The tier is resolved against the live settings on every tick, so
    /// the user changing the refresh interval takes effect at the next
    /// scheduling decision without re-binding.
    pub async fn bind_view(
        &self,
        key: QueryKey,
        tier: PollingTier,
        fetcher: Fetcher,
    ) -> ViewBinding {
        let gate = RefreshGate::tiered(tier, self.settings.clone(), self.visibility.clone());
        let subscription = self.cache.subscribe(key.clone(), fetcher).await;
        let poll = self.scheduler.schedule(key, gate).await;
        ViewBinding { subscription, poll }
    }

    /// Read a bound view's data, fetching first if it is stale.
    pub async fn read(&self, key: &QueryKey) -> CacheResult<EntrySnapshot> {
        self.cache.read(key).await
    }

    /// Switch the active cluster, sweeping all cluster-scoped entries.
    pub async fn switch_cluster(&self, cluster: &str) -> SyncResult<InvalidationReport> {
        self.switcher.switch(cluster).await
    }

    /// Stop every poll (application teardown).
    pub async fn shutdown(&self) {
        self.scheduler.stop_all().await;
    }
}
