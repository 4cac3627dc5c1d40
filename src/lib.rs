//! Stockroom - inventory administration console
//!
//! Session handling, route guarding, a query cache and the order workflow
//! on top of the `stockroom-client` REST client.

pub mod app;
pub mod cache;
pub mod config;
pub mod console;
pub mod error;
pub mod notify;
pub mod routes;
pub mod session;
pub mod utils;

pub use app::App;
pub use error::{Error, Result};
