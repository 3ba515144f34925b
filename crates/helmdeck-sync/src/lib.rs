//! helmdeck-sync — the top of the data-synchronization layer.
//!
//! Ties the other crates together:
//!
//! - [`invalidator`] — the cluster-scope sweep that marks every
//!   cluster-scoped cache entry stale on a context switch
//! - [`switcher`] — commits a cluster switch to the shared settings and
//!   runs the sweep, refusing to complete on sweep failure
//! - [`session`] — the per-application [`SyncSession`] views drive: bind
//!   a view (key + tier + fetcher) and it is subscribed, gated, and
//!   polled until unbound

pub mod error;
pub mod invalidator;
pub mod session;
pub mod switcher;

pub use error::{SyncError, SyncResult};
pub use invalidator::{InvalidationReport, invalidate_cluster_scope};
pub use session::{SyncSession, ViewBinding};
pub use switcher::ClusterSwitcher;
