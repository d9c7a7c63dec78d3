//! Configuration for the Wikimapia API client

use serde::{Deserialize, Serialize};

/// Wikimapia API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikimapiaConfig {
    /// API key issued by wikimapia.org
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// API endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Number of places requested from the nearby search
    #[serde(default = "default_nearby_count")]
    pub nearby_count: usize,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key() -> String {
    std::env::var("WIKIMAPIA_KEY").unwrap_or_default()
}

fn default_base_url() -> String {
    "http://api.wikimapia.org/".to_string()
}

fn default_nearby_count() -> usize {
    9
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for WikimapiaConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            nearby_count: default_nearby_count(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WikimapiaConfig {
    /// Create a config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Override the API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
