//! Polling tiers and refresh-period resolution.
//!
//! Every resource view polls at one of three named speeds resolved
//! against the user's base refresh interval. Centralizing the formula
//! here keeps tuning consistent across all views.

use serde::{Deserialize, Serialize};

/// Named polling speed class for a resource view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollingTier {
    /// Half the base interval, floored at [`MIN_FAST_MS`].
    Fast,
    /// The base interval as-is.
    Standard,
    /// Twice the base interval.
    Slow,
}

/// Minimum effective base interval in seconds.
pub const MIN_BASE_SECS: u64 = 5;

/// Base interval used when the configured value is unset or invalid.
pub const DEFAULT_BASE_SECS: u64 = 30;

/// Floor for the fast tier in milliseconds. Keeps an aggressively small
/// base interval from pushing any tier past a safe request rate.
pub const MIN_FAST_MS: u64 = 5_000;

/// Resolve a tier against a base interval in seconds, yielding a refresh
/// period in milliseconds.
///
/// Non-finite or non-positive inputs fall back to [`DEFAULT_BASE_SECS`];
/// valid inputs are rounded and clamped to [`MIN_BASE_SECS`]. Always
/// produces a positive period with `fast <= standard <= slow`.
pub fn resolve(tier: PollingTier, base_interval_secs: f64) -> u64 {
    let secs = if base_interval_secs.is_finite() && base_interval_secs > 0.0 {
        (base_interval_secs.round() as u64).max(MIN_BASE_SECS)
    } else {
        DEFAULT_BASE_SECS
    };

    let standard_ms = secs.saturating_mul(1_000);
    match tier {
        PollingTier::Fast => (standard_ms / 2).max(MIN_FAST_MS),
        PollingTier::Standard => standard_ms,
        PollingTier::Slow => standard_ms.saturating_mul(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_inputs_use_default() {
        for bad in [0.0, -1.0, -30.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(resolve(PollingTier::Standard, bad), 30_000, "input {bad}");
        }
    }

    #[test]
    fn tiers_are_ordered_for_valid_inputs() {
        for secs in [0.5, 1.0, 5.0, 8.0, 30.0, 60.0, 300.0, 86_400.0] {
            let fast = resolve(PollingTier::Fast, secs);
            let standard = resolve(PollingTier::Standard, secs);
            let slow = resolve(PollingTier::Slow, secs);
            assert!(fast <= standard, "fast > standard for {secs}");
            assert!(standard <= slow, "standard > slow for {secs}");
        }
    }

    #[test]
    fn fast_tier_never_drops_below_floor() {
        for secs in [-10.0, 0.0, 0.1, 1.0, 5.0, 8.0, 9.0, 10.0, 1e9] {
            assert!(resolve(PollingTier::Fast, secs) >= MIN_FAST_MS, "input {secs}");
        }
    }

    #[test]
    fn resolution_is_pure() {
        assert_eq!(
            resolve(PollingTier::Slow, 42.0),
            resolve(PollingTier::Slow, 42.0)
        );
    }

    #[test]
    fn eight_second_base() {
        // Fast is floored at 5000ms, not 4000ms.
        assert_eq!(resolve(PollingTier::Fast, 8.0), 5_000);
        assert_eq!(resolve(PollingTier::Standard, 8.0), 8_000);
        assert_eq!(resolve(PollingTier::Slow, 8.0), 16_000);
    }

    #[test]
    fn unset_base_resolves_to_default() {
        assert_eq!(resolve(PollingTier::Standard, 0.0), 30_000);
    }

    #[test]
    fn sub_minimum_base_is_clamped() {
        // 1s is below the 5s minimum.
        assert_eq!(resolve(PollingTier::Standard, 1.0), 5_000);
        assert_eq!(resolve(PollingTier::Fast, 1.0), 5_000);
        assert_eq!(resolve(PollingTier::Slow, 1.0), 10_000);
    }

    #[test]
    fn fractional_base_is_rounded() {
        assert_eq!(resolve(PollingTier::Standard, 29.6), 30_000);
        assert_eq!(resolve(PollingTier::Standard, 29.4), 29_000);
    }
}
