//! Runtime error type.

use std::sync::Arc;

use stockroom_client::ClientError;
use thiserror::Error;

/// Errors surfaced by the administration runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// A backend call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A cached query failed. Concurrent readers of the same key share it.
    #[error("{0}")]
    Fetch(Arc<ClientError>),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session snapshot is unreadable: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A command result could not be written as JSON.
    #[error("cannot render output: {0}")]
    Render(serde_json::Error),

    /// A cache key was read back as a different type than it was stored as.
    #[error("cache entry {0} holds a different type")]
    CacheType(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The backend error behind this one, if any.
    pub fn client(&self) -> Option<&ClientError> {
        match self {
            Error::Client(err) => Some(err),
            Error::Fetch(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.client().is_some_and(ClientError::is_unauthorized)
    }

    /// Text suitable for a user-facing notification.
    pub fn message(&self) -> String {
        match self.client() {
            Some(err) => err.message(),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_exposes_client_error() {
        let err = Error::Fetch(Arc::new(ClientError::Unauthorized));
        assert!(err.is_unauthorized());
        assert_eq!(err.client().and_then(ClientError::status), Some(401));
    }

    #[test]
    fn test_message_prefers_backend_text() {
        let err = Error::from(ClientError::Api {
            status: 422,
            message: "sku must be unique".to_string(),
        });
        assert_eq!(err.message(), "sku must be unique");

        let err = Error::InvalidConfig("cache.max_capacity must be positive".to_string());
        assert_eq!(
            err.message(),
            "invalid configuration: cache.max_capacity must be positive"
        );
    }
}
