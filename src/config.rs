use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chunk search API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Dataset id sent as the dataset-scoping header on every request
    #[serde(default)]
    pub dataset_id: String,

    /// API version header value
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Debounce window between option mutations and dispatched searches (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl ClientConfig {
    /// Load configuration from embedded defaults, an optional config file,
    /// and environment variables (prefix: CHUNK_SEARCH)
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("CHUNK_SEARCH_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CHUNK_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Construct a configuration for the given API host and dataset
    pub fn new(api_url: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            dataset_id: dataset_id.into(),
            api_version: default_api_version(),
            debounce_ms: default_debounce_ms(),
        }
    }

    /// Debounce window as a [`Duration`]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            dataset_id: String::new(),
            api_version: default_api_version(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8090/api".to_string()
}

fn default_api_version() -> String {
    "2.0".to_string()
}

fn default_debounce_ms() -> u64 {
    200
}
