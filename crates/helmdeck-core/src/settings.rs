//! Process-wide mutable dashboard settings.
//!
//! The user can change the refresh interval and the selected cluster at
//! runtime. Consumers read through a [`SettingsStore`] handle on every
//! scheduling decision, so changes take effect on the next tick of every
//! view without re-binding anything.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::tiers::DEFAULT_BASE_SECS;

/// User-adjustable runtime settings shared by every view.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base refresh interval in seconds. Stored as entered; clamping to
    /// the documented minimum/default happens at resolution time.
    pub refresh_interval_secs: f64,
    /// Name of the currently selected cluster. Empty until one is chosen.
    pub current_cluster: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_BASE_SECS as f64,
            current_cluster: String::new(),
        }
    }
}

/// Clone-able handle to the shared settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<Settings>>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn refresh_interval_secs(&self) -> f64 {
        self.read().refresh_interval_secs
    }

    pub fn set_refresh_interval_secs(&self, secs: f64) {
        self.write().refresh_interval_secs = secs;
    }

    pub fn current_cluster(&self) -> String {
        self.read().current_cluster.clone()
    }

    pub fn set_current_cluster(&self, name: &str) {
        self.write().current_cluster = name.to_string();
    }

    // Settings cannot be left torn by a panicked writer; recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }
}
