//! Client configuration loading from config.toml
//!
//! Every table and key is optional; anything missing falls back to the defaults that
//! reproduce the observed behaviour of the web client (last completed fetch wins, the
//! dashboard delta is read from the list view only, `isChecked` survives completion).

use super::gateway::GatewayConfig;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Number of recent appointments the dashboard keeps by default.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How to reach the clinic API
    pub gateway: GatewayConfig,
    /// Cache synchronization policies
    pub sync: SyncConfig,
}

/// What happens to `isChecked` when a confirmed appointment is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckedOnCompletion {
    /// Keep whatever the server echoed back
    #[default]
    Keep,
    /// Force the flag to false once the appointment is completed
    Reset,
}

/// How overlapping fetches of the same resource are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOrdering {
    /// The response that resolves last overwrites the cache
    #[default]
    LastCompletedWins,
    /// Responses older than the last applied request are dropped
    DiscardStale,
}

/// Where the previous status for a dashboard delta is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaScope {
    /// Only appointments in the list view contribute a delta
    #[default]
    List,
    /// Any cached view (list, selected, recent) can contribute a delta
    AnyView,
}

/// Cache synchronization policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum number of recent appointments kept for the dashboard
    pub recent_limit: usize,
    /// `isChecked` handling on completion
    pub checked_on_completion: CheckedOnCompletion,
    /// Ordering policy for overlapping fetches
    pub fetch_ordering: FetchOrdering,
    /// Source of the previous status for dashboard deltas
    pub delta_scope: DeltaScope,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            checked_on_completion: CheckedOnCompletion::default(),
            fetch_ordering: FetchOrdering::default(),
            delta_scope: DeltaScope::default(),
        }
    }
}

/// Loads client configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A policy value is not recognised
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid or a value has the wrong type.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from the default location (./config.toml)
///
/// A missing file is not an error; the defaults are used instead.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!("No config.toml found, using default configuration");
        Ok(Config::default())
    }
}
