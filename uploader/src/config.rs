//! Uploader configuration.
//!
//! The API token is read from the environment (after loading `.env`, if
//! present). Everything else has a fixed default.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "PELANOR_API_TOKEN";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "PELANOR_API_URL";

/// Pelanor API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pelanor.io/v1";

/// Request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the custom metrics API.
#[derive(Clone)]
pub struct UploaderConfig {
    pub api_token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl UploaderConfig {
    /// Create a config with an explicit token and default endpoint.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a config from `PELANOR_API_TOKEN` (and `PELANOR_API_URL`).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// An empty token counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup(TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken(TOKEN_ENV))?;

        let mut config = Self::new(api_token);
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(&url);
        }
        Ok(config)
    }

    /// Set the API base URL (without the `/custom-metrics` suffix)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the custom metrics endpoint.
    pub fn custom_metrics_url(&self) -> String {
        format!("{}/custom-metrics", self.base_url)
    }
}
