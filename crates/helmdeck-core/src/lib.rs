//! helmdeck-core — domain types for the dashboard data-sync layer.
//!
//! The dashboard keeps dozens of resource views fresh by polling a
//! REST-style backend. This crate holds the pieces every other layer
//! builds on:
//!
//! - [`tiers`] — polling speed classes and refresh-period resolution
//! - [`keys`] — query keys and the closed registry of view roots
//! - [`settings`] — process-wide mutable settings (refresh interval,
//!   currently selected cluster)
//! - [`config`] — the toml client configuration file
//! - [`client`] — the `ApiClient` seam the real HTTP client plugs into

pub mod client;
pub mod config;
pub mod keys;
pub mod settings;
pub mod tiers;

pub use client::{ApiClient, ApiError, FetchFuture, Fetcher};
pub use keys::{QueryKey, ROOTS, RootScope, RootSpec};
pub use settings::{Settings, SettingsStore};
pub use tiers::{PollingTier, resolve};
