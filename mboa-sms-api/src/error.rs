//! Service error types.

use mboa_sms_core::CoreError;
use mboa_sms_http::ClientError;
use thiserror::Error;

/// Errors returned by the API services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The input was rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The request failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ApiError {
    /// HTTP status of a failed request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client(e) => e.status(),
            Self::Validation(_) => None,
        }
    }

    /// Whether the user must sign in again.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_unauthenticated())
    }

    /// Whether the input was rejected locally.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message suitable for a toast: the backend's `message` field when the
    /// error body carries one, the error text otherwise.
    pub fn user_message(&self) -> String {
        if let Self::Client(ClientError::HttpStatus { body, .. }) = self {
            let message = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned));
            if let Some(message) = message {
                return message;
            }
        }
        self.to_string()
    }
}

/// Result type for service calls.
pub type ApiResult<T> = Result<T, ApiError>;
