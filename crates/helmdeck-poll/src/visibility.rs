//! The host's page-visibility signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether the page is currently in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Read-at-decision-time accessor for the host's visibility flag.
///
/// This is not an event subscription: the gate reads it synchronously
/// right before each scheduling decision. `None` means the host exposes
/// no flag at all (non-browser embeds), in which case the gate fails
/// open and keeps polling — suspension is an optimization, not a
/// correctness requirement.
pub trait VisibilitySignal: Send + Sync {
    fn visibility(&self) -> Option<Visibility>;
}

/// Signal for hosts without a visibility flag.
pub struct NoVisibilitySignal;

impl VisibilitySignal for NoVisibilitySignal {
    fn visibility(&self) -> Option<Visibility> {
        None
    }
}

/// Shared flag an embedder flips from the host's visibility events.
#[derive(Clone)]
pub struct SharedVisibility {
    visible: Arc<AtomicBool>,
}

impl SharedVisibility {
    pub fn new(initially_visible: bool) -> Self {
        Self {
            visible: Arc::new(AtomicBool::new(initially_visible)),
        }
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }
}

impl VisibilitySignal for SharedVisibility {
    fn visibility(&self) -> Option<Visibility> {
        if self.visible.load(Ordering::SeqCst) {
            Some(Visibility::Visible)
        } else {
            Some(Visibility::Hidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_signal_reports_none() {
        assert_eq!(NoVisibilitySignal.visibility(), None);
    }

    #[test]
    fn shared_flag_is_live_across_clones() {
        let signal = SharedVisibility::new(true);
        let handle = signal.clone();

        assert_eq!(signal.visibility(), Some(Visibility::Visible));
        handle.set_visible(false);
        assert_eq!(signal.visibility(), Some(Visibility::Hidden));
    }
}
