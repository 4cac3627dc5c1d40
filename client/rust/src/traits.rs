//! Seams between the API client, its transport, and the session that owns
//! the bearer token.
//!
//! The transport only moves bytes. Token injection and the 401 contract live
//! in [`crate::ApiClient`], which talks to the session through
//! [`TokenProvider`] and [`UnauthorizedObserver`] instead of a global event.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::{ApiRequest, RawResponse};

/// Executes a request and returns the response without interpreting status.
///
/// Implement this trait to create mock transports for testing or
/// alternative HTTP stacks.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Source of the current bearer token.
pub trait TokenProvider: Send + Sync {
    /// `None` sends the request unauthenticated.
    fn bearer_token(&self) -> Option<String>;
}

/// Notified when the API rejects the session token.
///
/// Called synchronously, before the failing request's future resolves, so
/// session state is already cleared when the caller sees the error.
pub trait UnauthorizedObserver: Send + Sync {
    fn on_unauthorized(&self, path: &str);
}
