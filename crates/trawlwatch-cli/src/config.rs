//! # CLI Configuration
//!
//! Environment-based configuration, read after `.env` is loaded.

use std::env;
use std::time::Duration;

use trawlwatch_map::api::DEFAULT_API_KEY_HEADER;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Backend connection and runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the REST API, version prefix included
    pub api_url: String,

    /// Static API key sent with every request
    pub api_key: String,

    /// Header carrying the API key
    pub api_key_header: String,

    /// Logging level when `RUST_LOG` is unset
    pub log_level: String,

    /// Latest-positions polling interval
    pub positions_refresh: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: lookup("TRAWLWATCH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),

            api_key: lookup("TRAWLWATCH_API_KEY").unwrap_or_default(),

            api_key_header: lookup("TRAWLWATCH_API_KEY_HEADER")
                .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            positions_refresh: Duration::from_secs(
                lookup("POSITIONS_REFRESH_SECS")
                    .and_then(|v| v.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(60),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
