//! Client configuration model.
//!
//! Loading lives in `acure-infrastructure`; this module only defines the
//! shape and its defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://acure-scan-api.abdabdulziza.workers.dev";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the edge API, without a trailing slash.
    pub api_base_url: String,
    /// Deadline applied to every REST call.
    pub request_timeout_secs: u64,
    /// Delay before a navigation re-dispatches its change notification.
    pub navigation_tick_ms: u64,
    pub cache: CacheSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 15,
            navigation_tick_ms: 10,
            cache: CacheSettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn navigation_tick(&self) -> Duration {
        Duration::from_millis(self.navigation_tick_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CacheSettings {
    /// Total characters the local store may hold (keys + values).
    pub capacity_chars: usize,
    /// Serialized records above this size lose their image before being written.
    pub max_record_chars: usize,
    /// How many of the oldest scan entries to drop when the store is full.
    pub eviction_batch: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity_chars: 5 * 1024 * 1024,
            max_record_chars: 5_000_000,
            eviction_batch: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            api_base_url = "http://localhost:8787"

            [cache]
            eviction_batch = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8787");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.cache.eviction_batch, 3);
        assert_eq!(config.cache.max_record_chars, 5_000_000);
    }
}
