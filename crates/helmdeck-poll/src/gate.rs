//! Refresh gating: period resolution plus the live visibility check.

use std::sync::Arc;
use std::time::Duration;

use helmdeck_core::{PollingTier, SettingsStore, resolve};

use crate::visibility::{Visibility, VisibilitySignal};

/// Decides, just in time, whether and how fast a key should refresh.
pub struct RefreshGate {
    source: PeriodSource,
    signal: Arc<dyn VisibilitySignal>,
}

enum PeriodSource {
    Fixed(Duration),
    /// Re-resolved against the live settings on every evaluation, so a
    /// runtime change to the refresh interval applies at the next tick
    /// of every view without re-binding anything.
    Tiered {
        tier: PollingTier,
        settings: SettingsStore,
    },
}

impl RefreshGate {
    /// Gate a fixed period.
    pub fn fixed(period: Duration, signal: Arc<dyn VisibilitySignal>) -> Self {
        Self {
            source: PeriodSource::Fixed(period),
            signal,
        }
    }

    /// Gate a tier resolved against the shared settings.
    pub fn tiered(tier: PollingTier, settings: SettingsStore, signal: Arc<dyn VisibilitySignal>) -> Self {
        Self {
            source: PeriodSource::Tiered { tier, settings },
            signal,
        }
    }

    /// Current refresh period, independent of visibility.
    pub fn period(&self) -> Duration {
        match &self.source {
            PeriodSource::Fixed(period) => *period,
            PeriodSource::Tiered { tier, settings } => {
                Duration::from_millis(resolve(*tier, settings.refresh_interval_secs()))
            }
        }
    }

    /// `Some(period)` when polling should proceed, `None` while the page
    /// is hidden. A host without a visibility signal fails open.
    pub fn poll(&self) -> Option<Duration> {
        match self.signal.visibility() {
            Some(Visibility::Hidden) => None,
            _ => Some(self.period()),
        }
    }
}
