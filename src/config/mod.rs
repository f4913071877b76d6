/// Gateway connection settings and environment overrides
pub mod gateway;

/// Client configuration loading from config.toml
pub mod settings;

pub use gateway::{API_TOKEN_ENV, API_URL_ENV, GatewayConfig};
pub use settings::{
    CheckedOnCompletion, Config, DeltaScope, FetchOrdering, SyncConfig, load_config,
    load_default_config, parse_config,
};
