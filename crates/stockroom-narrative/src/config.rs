//! # Narrative Configuration
//!
//! Connection settings for the generation endpoint. Loaded as the
//! `[narrative]` section of the dashboard's `stockroom.toml`.
//!
//! ```toml
//! [narrative]
//! enabled = true
//! endpoint = "https://narrative.example.com/v1/generate"
//! model = "stockroom-analyst"
//! timeout_secs = 15
//! api_token = "..."   # sent as "Authorization: Bearer ..."
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_endpoint() -> String {
    "http://localhost:8787/v1/generate".to_string()
}

fn default_model() -> String {
    "stockroom-analyst".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Off by default: the dashboard then always shows rule-based insights.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound for one generation call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Opaque bearer token issued by the authentication collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        NarrativeConfig {
            enabled: false,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            api_token: None,
        }
    }
}

impl NarrativeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
