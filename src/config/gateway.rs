//! Gateway connection settings.
//!
//! The base URL can come from config.toml or the `CLINIC_API_URL` environment variable
//! (environment wins). The bearer token is only ever read from `CLINIC_API_TOKEN` so it
//! never has to live in a checked-in file.

use serde::Deserialize;
use std::time::Duration;

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "CLINIC_API_URL";
/// Environment variable holding the bearer token.
pub const API_TOKEN_ENV: &str = "CLINIC_API_TOKEN";

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How to reach the clinic API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL, without a trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer token for authenticated endpoints
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

impl GatewayConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Applies explicit overrides. Blank values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self
    }

    /// Applies `CLINIC_API_URL` and `CLINIC_API_TOKEN` from the environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(API_TOKEN_ENV).ok(),
        )
    }
}
