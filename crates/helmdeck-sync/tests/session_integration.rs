//! End-to-end scenarios for the sync session.
//!
//! Drives the full stack the way the dashboard would: views bound
//! through a session, payloads served by a fetcher that answers for
//! whichever cluster is currently selected, and operator-driven
//! cluster switches in between.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use helmdeck_cache::ResourceCache;
use helmdeck_core::{Fetcher, PollingTier, Settings, SettingsStore, keys};
use helmdeck_poll::SharedVisibility;
use helmdeck_sync::SyncSession;
use serde_json::json;

fn session_for(cluster: &str) -> (SyncSession, SettingsStore) {
    let settings = SettingsStore::new(Settings {
        refresh_interval_secs: 30.0,
        current_cluster: cluster.to_string(),
    });
    let session = SyncSession::new(
        settings.clone(),
        ResourceCache::new(),
        Arc::new(SharedVisibility::new(true)),
    );
    (session, settings)
}

/// Answers with whichever cluster is selected at fetch time, the way the
/// backend resolves the cluster context per request.
fn cluster_fetcher(settings: SettingsStore, count: Arc<AtomicUsize>) -> Fetcher {
    Arc::new(move || {
        let cluster = settings.current_cluster();
        count.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { Ok(json!({ "cluster": cluster, "items": [] })) })
    })
}

#[tokio::test]
async fn cluster_switch_invalidates_and_refetches() {
    let (session, settings) = session_for("prod");
    let count = Arc::new(AtomicUsize::new(0));
    let key = keys::pods("default");

    let binding = session
        .bind_view(
            key.clone(),
            PollingTier::Standard,
            cluster_fetcher(settings.clone(), count.clone()),
        )
        .await;

    let snap = session.read(&key).await.unwrap();
    assert_eq!(snap.value.unwrap()["cluster"], "prod");
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // Fresh entries are served from cache.
    session.read(&key).await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let report = session.switch_cluster("staging").await.unwrap();
    assert_eq!(report.entries_marked, 1);

    // The next read must refetch rather than serve the prod payload.
    let snap = session.read(&key).await.unwrap();
    assert_eq!(snap.value.unwrap()["cluster"], "staging");
    assert_eq!(count.load(Ordering::SeqCst), 2);

    binding.unbind().await;
    session.shutdown().await;
}

#[tokio::test]
async fn global_views_survive_a_cluster_switch() {
    let (session, settings) = session_for("prod");
    let count = Arc::new(AtomicUsize::new(0));
    let key = keys::clusters();

    let binding = session
        .bind_view(
            key.clone(),
            PollingTier::Slow,
            cluster_fetcher(settings.clone(), count.clone()),
        )
        .await;

    session.read(&key).await.unwrap();
    session.switch_cluster("staging").await.unwrap();

    // The cluster inventory is not cluster-scoped: still fresh.
    let snap = session.read(&key).await.unwrap();
    assert!(!snap.stale);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    binding.unbind().await;
    session.shutdown().await;
}

#[tokio::test]
async fn switching_back_and_forth_always_refetches() {
    let (session, settings) = session_for("prod");
    let count = Arc::new(AtomicUsize::new(0));
    let key = keys::deployments("default");

    let binding = session
        .bind_view(
            key.clone(),
            PollingTier::Standard,
            cluster_fetcher(settings.clone(), count.clone()),
        )
        .await;

    session.read(&key).await.unwrap();

    session.switch_cluster("staging").await.unwrap();
    let snap = session.read(&key).await.unwrap();
    assert_eq!(snap.value.unwrap()["cluster"], "staging");

    // Back to prod: no memoized "already invalidated" shortcut.
    session.switch_cluster("prod").await.unwrap();
    let snap = session.read(&key).await.unwrap();
    assert_eq!(snap.value.unwrap()["cluster"], "prod");
    assert_eq!(count.load(Ordering::SeqCst), 3);

    binding.unbind().await;
    session.shutdown().await;
}

#[tokio::test]
async fn namespaced_views_invalidate_together() {
    let (session, settings) = session_for("prod");
    let count = Arc::new(AtomicUsize::new(0));
    let default_ns = keys::pods("default");
    let kube_system = keys::pods("kube-system");

    let b1 = session
        .bind_view(
            default_ns.clone(),
            PollingTier::Fast,
            cluster_fetcher(settings.clone(), count.clone()),
        )
        .await;
    let b2 = session
        .bind_view(
            kube_system.clone(),
            PollingTier::Fast,
            cluster_fetcher(settings.clone(), count.clone()),
        )
        .await;

    session.read(&default_ns).await.unwrap();
    session.read(&kube_system).await.unwrap();

    let report = session.switch_cluster("staging").await.unwrap();
    // Params are wildcarded: both namespaces of the pods root are swept.
    assert_eq!(report.entries_marked, 2);

    b1.unbind().await;
    b2.unbind().await;
    session.shutdown().await;
}
