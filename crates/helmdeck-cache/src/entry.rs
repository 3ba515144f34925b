//! Cache entries: snapshots, staleness, and the per-key fetch gate.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use helmdeck_core::{Fetcher, QueryKey};
use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tracing::debug;

/// Fetch lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Created, never fetched.
    Idle,
    /// A fetch is in flight.
    Fetching,
    /// The last fetch produced a payload.
    Success,
    /// The last fetch failed; `value` still holds the previous payload.
    Error,
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub value: Option<Value>,
    pub status: FetchStatus,
    pub fetched_at: Option<Instant>,
    pub error: Option<String>,
    /// Stale entries refetch on next read instead of serving `value`
    /// as trustworthy.
    pub stale: bool,
}

impl EntrySnapshot {
    fn initial() -> Self {
        Self {
            value: None,
            status: FetchStatus::Idle,
            fetched_at: None,
            error: None,
            stale: true,
        }
    }
}

struct EntryInner {
    snapshot: EntrySnapshot,
    /// Bumped on invalidation. A fetch only clears staleness when the
    /// epoch it started under is still current at completion, so an
    /// in-flight result cannot overwrite a newer invalidation.
    epoch: u64,
    subscribers: usize,
}

/// Shared state of one cache entry.
pub(crate) struct EntryState {
    key: QueryKey,
    inner: Mutex<EntryInner>,
    tx: watch::Sender<EntrySnapshot>,
    /// Serializes fetches: no new fetch for this key starts while a
    /// previous one is still in flight.
    fetch_gate: AsyncMutex<()>,
    fetcher: Fetcher,
}

impl EntryState {
    pub(crate) fn new(key: QueryKey, fetcher: Fetcher) -> Arc<Self> {
        let snapshot = EntrySnapshot::initial();
        let (tx, _rx) = watch::channel(snapshot.clone());
        Arc::new(Self {
            key,
            inner: Mutex::new(EntryInner {
                snapshot,
                epoch: 0,
                subscribers: 0,
            }),
            tx,
            fetch_gate: AsyncMutex::new(()),
            fetcher,
        })
    }

    pub(crate) fn snapshot(&self) -> EntrySnapshot {
        self.lock().snapshot.clone()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<EntrySnapshot> {
        self.tx.subscribe()
    }

    pub(crate) fn add_subscriber(&self) {
        self.lock().subscribers += 1;
    }

    /// Returns the number of subscribers remaining.
    pub(crate) fn remove_subscriber(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers = inner.subscribers.saturating_sub(1);
        inner.subscribers
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().subscribers
    }

    /// Mark the entry stale and bump its epoch.
    pub(crate) fn mark_stale(&self) {
        let snap = {
            let mut inner = self.lock();
            inner.epoch += 1;
            inner.snapshot.stale = true;
            inner.snapshot.clone()
        };
        self.publish(snap);
    }

    /// Fetch only if the entry is stale or has never produced a value.
    pub(crate) async fn ensure_fresh(&self) -> EntrySnapshot {
        self.fetch(false).await
    }

    /// Fetch unconditionally (scheduler tick).
    pub(crate) async fn force_refresh(&self) -> EntrySnapshot {
        self.fetch(true).await
    }

    async fn fetch(&self, force: bool) -> EntrySnapshot {
        let _gate = self.fetch_gate.lock().await;

        // A reader that waited at the gate may find the entry already
        // refreshed by whoever held it.
        let started_epoch = {
            let mut inner = self.lock();
            let needs = force || inner.snapshot.stale || inner.snapshot.value.is_none();
            if !needs {
                return inner.snapshot.clone();
            }
            inner.snapshot.status = FetchStatus::Fetching;
            inner.epoch
        };
        self.publish(self.snapshot());

        let result = (self.fetcher)().await;

        let snap = {
            let mut inner = self.lock();
            match result {
                Ok(value) => {
                    inner.snapshot.value = Some(value);
                    inner.snapshot.status = FetchStatus::Success;
                    inner.snapshot.error = None;
                    inner.snapshot.fetched_at = Some(Instant::now());
                    if inner.epoch == started_epoch {
                        inner.snapshot.stale = false;
                    } else {
                        debug!(key = %self.key, "fetch outlived an invalidation, staying stale");
                    }
                }
                Err(e) => {
                    // Keep the previous value; record the failure. Staleness
                    // is untouched so the next read retries.
                    inner.snapshot.status = FetchStatus::Error;
                    inner.snapshot.error = Some(e.to_string());
                    debug!(key = %self.key, error = %e, "fetch failed");
                }
            }
            inner.snapshot.clone()
        };
        self.publish(snap.clone());
        snap
    }

    fn publish(&self, snap: EntrySnapshot) {
        // No receivers is fine; snapshot() reads the locked state directly.
        let _ = self.tx.send(snap);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EntryInner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}
