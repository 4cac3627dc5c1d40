//! Session persistence and query cache configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Storage key the session snapshot is persisted under.
pub const DEFAULT_SESSION_KEY: &str = "auth-storage";
/// Default session file, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".stockroom/session.json";

/// Session persistence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON file holding persisted snapshots.
    pub storage_path: PathBuf,
    /// Key of this application's snapshot inside the file.
    /// Default: "auth-storage"
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_SESSION_FILE),
            storage_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

/// Query cache and fetch retry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a fetched entry stays fresh.
    pub stale_time_secs: u64,
    /// Maximum number of cached queries.
    pub max_capacity: u64,
    /// Retries for a failing query fetch. Mutations are never retried.
    pub retry_attempts: usize,
    /// Initial retry delay in milliseconds.
    pub retry_min_delay_ms: u64,
    /// Retry delay ceiling in milliseconds.
    pub retry_max_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_secs: 60,
            max_capacity: 1_000,
            retry_attempts: 3,
            retry_min_delay_ms: 200,
            retry_max_delay_ms: 5_000,
        }
    }
}

impl CacheConfig {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }

    pub fn retry_min_delay(&self) -> Duration {
        Duration::from_millis(self.retry_min_delay_ms)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }
}
