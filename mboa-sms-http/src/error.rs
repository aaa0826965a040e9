//! Client error types.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// The request never produced an HTTP response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection error (DNS, refused, reset).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request could not be built (bad URL, header or form part).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Errors returned by [`AuthenticatedHttpClient`](crate::AuthenticatedHttpClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-2xx response, or a 401 that survived one refresh.
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
        /// Response headers.
        headers: HeaderMap,
    },

    /// A 401 that refreshing could not resolve.
    #[error("Unauthenticated: session expired")]
    Unauthenticated,

    /// The refresh episode ended without delivering a result.
    #[error("Token refresh was interrupted")]
    RefreshInterrupted,

    /// The response body did not match the expected type.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialised.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create an HTTP status error without headers.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Get the HTTP status if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session is gone and the user must sign in again.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Whether no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
