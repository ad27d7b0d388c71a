//! # Frontend Configuration
//!
//! Values baked in at build time through `option_env!`, so the same
//! variables that drive the CLI also point the dashboard at a backend.

use trawlwatch_map::api::DEFAULT_API_KEY_HEADER;
use trawlwatch_map::stores::map_view::INITIAL_VIEW_STATE;
use trawlwatch_map::stores::ViewState;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Latest-positions polling interval when none is configured
pub const DEFAULT_POSITIONS_REFRESH_MS: u32 = 60_000;

/// Metrics window when the page opens
pub const DEFAULT_METRICS_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct FrontendConfig {
    pub api_url: String,
    pub api_key: String,
    pub api_key_header: String,
    /// Camera when the map mounts
    pub initial_view: ViewState,
    pub positions_refresh_ms: u32,
    pub metrics_window_days: i64,
}

impl FrontendConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("TRAWLWATCH_API_URL"),
            option_env!("TRAWLWATCH_API_KEY"),
            option_env!("TRAWLWATCH_API_KEY_HEADER"),
            option_env!("POSITIONS_REFRESH_SECS"),
        )
    }

    fn from_values(
        api_url: Option<&str>,
        api_key: Option<&str>,
        api_key_header: Option<&str>,
        refresh_secs: Option<&str>,
    ) -> Self {
        let positions_refresh_ms = refresh_secs
            .and_then(|secs| secs.parse::<u32>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_POSITIONS_REFRESH_MS, |secs| secs.saturating_mul(1000));

        Self {
            api_url: api_url.unwrap_or(DEFAULT_API_URL).to_string(),
            api_key: api_key.unwrap_or_default().to_string(),
            api_key_header: api_key_header.unwrap_or(DEFAULT_API_KEY_HEADER).to_string(),
            initial_view: INITIAL_VIEW_STATE,
            positions_refresh_ms,
            metrics_window_days: DEFAULT_METRICS_WINDOW_DAYS,
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FrontendConfig::from_values(None, None, None, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key_header, "x-key");
        assert_eq!(config.positions_refresh_ms, 60_000);
        assert_eq!(config.initial_view, INITIAL_VIEW_STATE);
    }

    #[test]
    fn test_refresh_override() {
        let config = FrontendConfig::from_values(None, Some("k"), None, Some("15"));
        assert_eq!(config.api_key, "k");
        assert_eq!(config.positions_refresh_ms, 15_000);

        let config = FrontendConfig::from_values(None, None, None, Some("soon"));
        assert_eq!(config.positions_refresh_ms, DEFAULT_POSITIONS_REFRESH_MS);
    }
}
