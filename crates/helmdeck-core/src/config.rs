//! Dashboard client configuration file parser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Client configuration, normally loaded from `helmdeck.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub refresh: Option<RefreshConfig>,
    pub cluster: Option<ClusterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the dashboard backend (e.g. `https://dash.example.com/api/v1`).
    pub base_url: String,
    /// Request timeout (e.g. "10s"). Interpreted by the HTTP client.
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Initial base refresh interval in seconds.
    pub interval_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster selected at startup before the user picks one.
    pub default: Option<String>,
}

impl ClientConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Initial runtime settings derived from this config.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(interval) = self.refresh.as_ref().and_then(|r| r.interval_secs) {
            settings.refresh_interval_secs = interval;
        }
        if let Some(default) = self.cluster.as_ref().and_then(|c| c.default.clone()) {
            settings.current_cluster = default;
        }
        settings
    }
}
