//! Presence checks applied to request bodies before they are sent.
//!
//! Eliminates repeated validation boilerplate across services. The backend
//! still validates everything; these only catch obviously incomplete input.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockroom_client::validation::{require_non_empty, require_non_negative};
//!
//! fn check(input: &ProductInput) -> Result<()> {
//!     require_non_empty(&input.name, "name")?;
//!     require_non_negative(input.price, "price")?;
//!     Ok(())
//! }
//! ```

use crate::error::{ClientError, Result};

/// Require a string with at least one non-whitespace character.
pub fn require_non_empty(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidArgument(format!(
            "{field_name} is required"
        )));
    }
    Ok(())
}

/// Require a non-empty list.
pub fn require_any<T>(values: &[T], field_name: &str) -> Result<()> {
    if values.is_empty() {
        return Err(ClientError::InvalidArgument(format!(
            "{field_name} must not be empty"
        )));
    }
    Ok(())
}

/// Require that a value is positive (greater than zero).
pub fn require_positive<T: PartialOrd + Default>(value: T, field_name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(ClientError::InvalidArgument(format!(
            "{field_name} must be positive"
        )));
    }
    Ok(())
}

/// Require that a value is non-negative (zero or greater).
pub fn require_non_negative<T: PartialOrd + Default>(value: T, field_name: &str) -> Result<()> {
    if value < T::default() {
        return Err(ClientError::InvalidArgument(format!(
            "{field_name} must be non-negative"
        )));
    }
    Ok(())
}

/// Require a non-zero value, for deltas where either sign is meaningful.
pub fn require_non_zero<T: PartialEq + Default>(value: T, field_name: &str) -> Result<()> {
    if value == T::default() {
        return Err(ClientError::InvalidArgument(format!(
            "{field_name} must not be zero"
        )));
    }
    Ok(())
}
