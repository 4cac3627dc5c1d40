//! Error types for the Stockroom client library.

use crate::status::{InvalidStatus, OrderStatus};

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Failed to reach the server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Transport-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API (other than 401).
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },

    /// The session token was rejected (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Invalid argument provided by caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A status string outside the known set.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),

    /// The transition table does not offer this move.
    #[error("transition {from} -> {to} is not allowed")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Connection(msg) => msg.clone(),
            ClientError::Http(e) => e.to_string(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Unauthorized => "session expired, please log in again".to_string(),
            ClientError::InvalidArgument(msg) => msg.clone(),
            ClientError::InvalidStatus(e) => e.to_string(),
            ClientError::InvalidTransition { .. } => self.to_string(),
            ClientError::Decode(e) => e.to_string(),
        }
    }

    /// Returns the HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Returns true if the session token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// Returns true for caller-side input problems, local or reported by the server.
    pub fn is_validation(&self) -> bool {
        matches!(self.status(), Some(400) | Some(422))
            || matches!(
                self,
                ClientError::InvalidArgument(_)
                    | ClientError::InvalidStatus(_)
                    | ClientError::InvalidTransition { .. }
            )
    }

    /// Returns true if this is a connection or transport error.
    pub fn is_connection_error(&self) -> bool {
        match self {
            ClientError::Connection(_) => true,
            ClientError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Returns true if repeating the same request may succeed.
    ///
    /// Timeouts, connection failures, 429 and 5xx responses qualify.
    /// Authentication and validation failures never do.
    pub fn is_retryable(&self) -> bool {
        if self.is_connection_error() {
            return true;
        }
        match self {
            ClientError::Api { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}
