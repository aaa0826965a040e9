//! Validation errors for core types.

use thiserror::Error;

/// Errors raised while validating dashboard input before it reaches the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The value is not a Cameroonian phone number.
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// The sender name does not satisfy the alphanumeric 3-11 rule.
    #[error("Invalid sender name '{name}': {reason}")]
    InvalidSenderName {
        /// Rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required field is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Any other validation failure.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Create an invalid phone error.
    pub fn invalid_phone(raw: impl Into<String>) -> Self {
        Self::InvalidPhone(raw.into())
    }

    /// Create an invalid sender name error.
    pub fn invalid_sender_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSenderName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = std::result::Result<T, CoreError>;
