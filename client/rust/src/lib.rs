//! Typed Rust client for the Stockroom inventory administration API.
//!
//! This crate provides one service per REST resource over a shared,
//! authenticated [`ApiClient`], the wire records those services exchange,
//! and the order status workflow table.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockroom_client::{ApiClient, HttpTransportConfig, OrderStatus, Services};
//!
//! async fn example(session: Arc<MySession>) -> stockroom_client::Result<()> {
//!     let transport = HttpTransportConfig::default().with_base_url("https://api.shop.test");
//!     let api = ApiClient::http(transport)?.with_token_provider(session.clone());
//!     // Session is told synchronously when the API answers 401.
//!     api.subscribe_unauthorized(session);
//!
//!     let services = Services::new(api);
//!     let order = services.orders.get(42).await?;
//!     for next in order.status.transitions() {
//!         println!("can move to {}", next.label());
//!     }
//!     services.orders.update_status(42, OrderStatus::Print).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Mocking for Tests
//!
//! Enable the `test-utils` feature for [`mock::MockTransport`], or implement
//! [`ApiTransport`] directly.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod model;
pub mod request;
pub mod services;
pub mod status;
pub mod traits;
pub mod transport;
pub mod validation;

// Re-export main types at crate root
pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use request::{ApiRequest, FilePart, RawResponse, RequestBody};
pub use services::Services;
pub use status::{InvalidStatus, OrderStatus, TransitionTable};
pub use traits::{ApiTransport, TokenProvider, UnauthorizedObserver};
pub use transport::{HttpTransport, HttpTransportConfig};

// HTTP method type used by `ApiRequest`
pub use reqwest::Method;
