//! Configuration management for the six cities client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file in the working directory is read first, if present.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Listings service used when `SIX_CITIES_API_URL` is unset
pub const DEFAULT_API_URL: &str = "https://15.design.htmlacademy.pro/six-cities";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the listings service
    pub api_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// File holding the session token
    pub token_path: PathBuf,
    /// Actions buffered per store subscriber
    pub broadcast_capacity: usize,
    /// How long the CLI waits for an operation to settle, in seconds
    pub wait_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 5,
            token_path: PathBuf::from(".six-cities-token"),
            broadcast_capacity: 64,
            wait_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` first. Unset or unparsable variables fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_url: var("SIX_CITIES_API_URL").unwrap_or(defaults.api_url),
            request_timeout_secs: var("SIX_CITIES_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            token_path: var("SIX_CITIES_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
            broadcast_capacity: var("SIX_CITIES_BROADCAST_CAPACITY")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.broadcast_capacity),
            wait_timeout_secs: var("SIX_CITIES_WAIT_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.wait_timeout_secs),
        }
    }

    /// Per-request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Wait timeout for settled operations
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_vars(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("SIX_CITIES_API_URL", "http://localhost:3000"),
            ("SIX_CITIES_REQUEST_TIMEOUT_SECS", "2"),
            ("SIX_CITIES_TOKEN_PATH", "/tmp/token"),
            ("SIX_CITIES_BROADCAST_CAPACITY", "0"),
            ("SIX_CITIES_WAIT_TIMEOUT_SECS", "soon"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_vars(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.request_timeout_secs, 2);
        assert_eq!(config.token_path, PathBuf::from("/tmp/token"));
        assert_eq!(config.broadcast_capacity, 64);
        assert_eq!(config.wait_timeout_secs, 10);
    }
}
