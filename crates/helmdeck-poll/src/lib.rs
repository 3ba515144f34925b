//! helmdeck-poll — visibility-gated polling.
//!
//! Keeps cache entries fresh by running one background refresh loop per
//! query key. Each tick consults a [`RefreshGate`] just in time: while
//! the page is hidden the loop keeps ticking but skips the fetch, so a
//! return to the foreground resumes at the full period with no catch-up
//! burst. Polls are disposed of explicitly through [`PollHandle`]s or
//! the scheduler's stop operations.

pub mod gate;
pub mod scheduler;
pub mod visibility;

pub use gate::RefreshGate;
pub use scheduler::{PollHandle, PollScheduler};
pub use visibility::{NoVisibilitySignal, SharedVisibility, Visibility, VisibilitySignal};
