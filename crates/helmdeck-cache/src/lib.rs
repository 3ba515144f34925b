//! helmdeck-cache — the reactive resource cache.
//!
//! One entry per [`QueryKey`](helmdeck_core::QueryKey): the latest fetched
//! payload, fetch status, error state, and a staleness marker. Views
//! subscribe to entries and observe snapshot changes over a watch channel;
//! reads fetch lazily when the entry is stale or empty; invalidation marks
//! entries stale without refetching them eagerly.
//!
//! # Guarantees
//!
//! - Fetches for a single key are strictly sequential (a per-entry fetch
//!   gate); a reader arriving mid-fetch waits and reuses the result.
//! - A fetch that resolves after a newer invalidation does not clear the
//!   stale marker (entries carry an invalidation epoch).
//! - Entries live while at least one subscriber exists, plus a grace
//!   period after the last one drops.

pub mod cache;
pub mod entry;
pub mod error;

pub use cache::{QuerySubscription, ResourceCache};
pub use entry::{EntrySnapshot, FetchStatus};
pub use error::{CacheError, CacheResult};
