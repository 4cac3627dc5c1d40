//! Step definition modules for Cucumber feature tests.

pub mod error_handling;
pub mod order_status;
pub mod session_signal;
