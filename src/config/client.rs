//! Backend connection and order workflow configuration types.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use stockroom_client::{HttpTransportConfig, TransitionTable};

use crate::error::{Error, Result};

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
/// Default request timeout in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Configuration
// ============================================================================

/// Backend API connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is joined to.
    /// Default: "http://localhost:3000"
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Overrides the default `User-Agent`.
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ApiConfig {
    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> HttpTransportConfig {
        let config = HttpTransportConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        match &self.user_agent {
            Some(agent) => config.with_user_agent(agent.clone()),
            None => config,
        }
    }
}

/// Order status workflow.
///
/// Without `transitions` the builtin table is used. An override must give a
/// row for every status:
///
/// ```yaml
/// workflow:
///   transitions:
///     NEW: [PRINT, MISSING, REFUND]
///     REFUND: []
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub transitions: Option<HashMap<String, Vec<String>>>,
}

impl WorkflowConfig {
    /// The transition table the console offers and checks against.
    pub fn table(&self) -> Result<TransitionTable> {
        match &self.transitions {
            Some(map) => TransitionTable::from_map(map).map_err(|e| {
                Error::InvalidConfig(format!("workflow.transitions: {}", e.message()))
            }),
            None => Ok(TransitionTable::builtin()),
        }
    }
}
