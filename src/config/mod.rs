//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod client;
mod runtime;

pub use client::{ApiConfig, WorkflowConfig, DEFAULT_API_TIMEOUT_SECS, DEFAULT_API_URL};
pub use runtime::{CacheConfig, SessionConfig, DEFAULT_SESSION_FILE, DEFAULT_SESSION_KEY};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "stockroom.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "STOCKROOM_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "STOCKROOM";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "STOCKROOM_LOG";

use serde::Deserialize;

use crate::error::{Error, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API connection.
    pub api: ApiConfig,
    /// Session persistence.
    pub session: SessionConfig,
    /// Query cache.
    pub cache: CacheConfig,
    /// Order status workflow override.
    pub workflow: WorkflowConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `stockroom.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix, e.g.
    ///    `STOCKROOM__API__BASE_URL`
    pub fn load(path: Option<&str>) -> Result<Self> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("api.base_url is required".to_string()));
        }
        if self.cache.max_capacity == 0 {
            return Err(Error::InvalidConfig(
                "cache.max_capacity must be positive".to_string(),
            ));
        }
        if self.session.storage_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "session.storage_key is required".to_string(),
            ));
        }
        self.workflow.table()?;
        Ok(())
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests;
