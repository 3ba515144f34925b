//! Poll scheduler — one background refresh loop per query key.

use std::collections::HashMap;
use std::sync::Arc;

use helmdeck_cache::ResourceCache;
use helmdeck_core::QueryKey;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::gate::RefreshGate;

/// Per-key poll state.
struct PollSlot {
    /// Handle to the background refresh task.
    handle: JoinHandle<()>,
    /// Shutdown signal for this poll.
    shutdown_tx: watch::Sender<bool>,
}

/// Schedules periodic cache refreshes for subscribed keys.
#[derive(Clone)]
pub struct PollScheduler {
    cache: ResourceCache,
    /// Active polls: key → slot.
    polls: Arc<RwLock<HashMap<QueryKey, PollSlot>>>,
}

impl PollScheduler {
    pub fn new(cache: ResourceCache) -> Self {
        Self {
            cache,
            polls: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start polling a key through the given gate.
    ///
    /// Replaces any existing poll for the same key. Returns an explicit
    /// cancel token; the poll keeps running until the token or the
    /// scheduler stops it.
    pub async fn schedule(&self, key: QueryKey, gate: RefreshGate) -> PollHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let cache = self.cache.clone();
        let loop_key = key.clone();
        let handle = tokio::spawn(async move {
            run_poll_loop(loop_key, gate, cache, shutdown_rx).await;
        });

        let mut polls = self.polls.write().await;
        if let Some(old) = polls.insert(
            key.clone(),
            PollSlot {
                handle,
                shutdown_tx,
            },
        ) {
            // Stop the old poll if one was running.
            let _ = old.shutdown_tx.send(true);
            old.handle.abort();
        }
        debug!(%key, "poll scheduled");

        PollHandle {
            key,
            scheduler: self.clone(),
        }
    }

    /// Stop polling a key.
    pub async fn stop_poll(&self, key: &QueryKey) {
        let mut polls = self.polls.write().await;
        if let Some(slot) = polls.remove(key) {
            let _ = slot.shutdown_tx.send(true);
            slot.handle.abort();
            debug!(%key, "poll stopped");
        }
    }

    /// Stop all polls (for teardown).
    pub async fn stop_all(&self) {
        let mut polls = self.polls.write().await;
        for (key, slot) in polls.drain() {
            let _ = slot.shutdown_tx.send(true);
            slot.handle.abort();
            debug!(%key, "poll stopped");
        }
        info!("all polls stopped");
    }

    /// Keys with active polls.
    pub async fn active_polls(&self) -> Vec<QueryKey> {
        let polls = self.polls.read().await;
        polls.keys().cloned().collect()
    }

    pub async fn is_polling(&self, key: &QueryKey) -> bool {
        let polls = self.polls.read().await;
        polls.contains_key(key)
    }
}

/// Cancel token for one scheduled poll.
pub struct PollHandle {
    key: QueryKey,
    scheduler: PollScheduler,
}

impl PollHandle {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Stop the poll this handle refers to.
    pub async fn cancel(self) {
        self.scheduler.stop_poll(&self.key).await;
    }
}

/// The refresh loop for a single key.
async fn run_poll_loop(
    key: QueryKey,
    gate: RefreshGate,
    cache: ResourceCache,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!(%key, period = ?gate.period(), "poll loop starting");

    loop {
        let period = gate.period();

        tokio::select! {
            _ = tokio::time::sleep(period) => {
                // Just-in-time gate check: hiding the page mid-cycle lets
                // the current tick pass without a fetch, and the loop keeps
                // ticking so the return to foreground resumes at the full
                // period with no catch-up burst.
                if gate.poll().is_none() {
                    trace!(%key, "poll suspended, page hidden");
                    continue;
                }
                match cache.refresh(&key).await {
                    Ok(snap) => trace!(%key, status = ?snap.status, "poll refreshed"),
                    Err(e) => {
                        // Entry collected out from under us; nothing left to poll.
                        debug!(%key, error = %e, "poll target gone, stopping");
                        break;
                    }
                }
            }
            _ = shutdown.changed() => {
                debug!(%key, "poll loop shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::SharedVisibility;
    use helmdeck_core::{Fetcher, keys};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_fetcher() -> (Fetcher, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let fetcher: Fetcher = Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(json!([])) })
        });
        (fetcher, count)
    }

    fn fixed_gate(ms: u64, signal: &SharedVisibility) -> RefreshGate {
        RefreshGate::fixed(Duration::from_millis(ms), Arc::new(signal.clone()))
    }

    #[tokio::test]
    async fn schedule_and_stop_lifecycle() {
        let cache = ResourceCache::new();
        let scheduler = PollScheduler::new(cache.clone());
        let (fetcher, _) = counting_fetcher();
        let key = keys::pods("default");
        let _sub = cache.subscribe(key.clone(), fetcher).await;

        assert!(scheduler.active_polls().await.is_empty());

        let signal = SharedVisibility::new(true);
        let _handle = scheduler.schedule(key.clone(), fixed_gate(1_000, &signal)).await;
        assert!(scheduler.is_polling(&key).await);

        scheduler.stop_poll(&key).await;
        assert!(!scheduler.is_polling(&key).await);
    }

    #[tokio::test]
    async fn reschedule_replaces_the_existing_poll() {
        let cache = ResourceCache::new();
        let scheduler = PollScheduler::new(cache.clone());
        let (fetcher, _) = counting_fetcher();
        let key = keys::nodes();
        let _sub = cache.subscribe(key.clone(), fetcher).await;

        let signal = SharedVisibility::new(true);
        let _first = scheduler.schedule(key.clone(), fixed_gate(1_000, &signal)).await;
        let _second = scheduler.schedule(key.clone(), fixed_gate(2_000, &signal)).await;

        assert_eq!(scheduler.active_polls().await.len(), 1);
        scheduler.stop_all().await;
        assert!(scheduler.active_polls().await.is_empty());
    }

    #[tokio::test]
    async fn handle_cancels_its_poll() {
        let cache = ResourceCache::new();
        let scheduler = PollScheduler::new(cache.clone());
        let (fetcher, _) = counting_fetcher();
        let key = keys::alerts();
        let _sub = cache.subscribe(key.clone(), fetcher).await;

        let signal = SharedVisibility::new(true);
        let handle = scheduler.schedule(key.clone(), fixed_gate(1_000, &signal)).await;
        assert!(scheduler.is_polling(&key).await);

        handle.cancel().await;
        assert!(!scheduler.is_polling(&key).await);
    }

    #[tokio::test]
    async fn visible_poll_refreshes_periodically() {
        let cache = ResourceCache::new();
        let scheduler = PollScheduler::new(cache.clone());
        let (fetcher, count) = counting_fetcher();
        let key = keys::pods("default");
        let _sub = cache.subscribe(key.clone(), fetcher).await;

        let signal = SharedVisibility::new(true);
        let _handle = scheduler.schedule(key.clone(), fixed_gate(30, &signal)).await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        scheduler.stop_all().await;

        let fetched = count.load(Ordering::SeqCst);
        assert!(fetched >= 2, "expected periodic refreshes, got {fetched}");
    }

    #[tokio::test]
    async fn hidden_poll_fetches_nothing_and_resumes_without_burst() {
        let cache = ResourceCache::new();
        let scheduler = PollScheduler::new(cache.clone());
        let (fetcher, count) = counting_fetcher();
        let key = keys::deployments("default");
        let _sub = cache.subscribe(key.clone(), fetcher).await;

        let signal = SharedVisibility::new(false);
        let _handle = scheduler.schedule(key.clone(), fixed_gate(40, &signal)).await;

        // Hidden: ticks pass, no fetches.
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // Back to the foreground: refreshing resumes at the normal
        // cadence, without a burst of queued fetches.
        signal.set_visible(true);
        tokio::time::sleep(Duration::from_millis(110)).await;
        scheduler.stop_all().await;

        let fetched = count.load(Ordering::SeqCst);
        assert!(fetched >= 1, "polling did not resume");
        assert!(fetched <= 3, "catch-up burst after restore: {fetched} fetches");
    }
}
