//! # mboa-sms-http
//!
//! Authenticated HTTP client for the MboaSMS REST API.
//!
//! ## Core Concepts
//!
//! - **[`AuthenticatedHttpClient`]**: attaches bearer tokens and renews an
//!   expired access token once, for every request that hit the same 401
//! - **[`Transport`]**: one network exchange ([`ReqwestTransport`], [`MockTransport`])
//! - **[`TokenStore`]**: where the access/refresh pair lives
//!   ([`MemoryTokenStore`], [`FileTokenStore`])
//! - **[`SessionExpiredHandler`]**: told once when a session cannot be renewed
//! - **[`RequestPipeline`]**: ordered stages applied to every outgoing request
//!
//! ## Refresh protocol
//!
//! The first request to receive a 401 starts a refresh and every 401 observed
//! while it runs is queued behind it. On success the new tokens are stored and
//! the queue is replayed in arrival order; a second 401 on a replay is
//! returned as an ordinary status error. On failure the tokens are cleared,
//! the handler runs once and every queued request fails with
//! [`ClientError::Unauthenticated`].
//!
//! ## Example
//!
//! ```ignore
//! use mboa_sms_http::{AuthenticatedHttpClient, ClientConfig, SessionNotifier};
//!
//! let notifier = SessionNotifier::default();
//! let mut expired = notifier.subscribe();
//!
//! let client = AuthenticatedHttpClient::builder()
//!     .config(ClientConfig::from_env()?)
//!     .on_session_expired(notifier)
//!     .build()?;
//!
//! let contacts: serde_json::Value = client.get("/contacts").await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod pipeline;
mod refresh;
pub mod request;
pub mod session;
pub mod token_store;
pub mod transport;

// Re-exports
pub use client::{AuthenticatedHttpClient, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, TransportError};
pub use mock::{MockGate, MockTransport};
pub use pipeline::{
    AttachBearer, DefaultHeaders, InferContentType, RequestIdStage, RequestPipeline, RequestStage,
};
pub use request::{
    FormPart, FormValue, HttpRequest, HttpResponse, MultipartForm, RequestBody, RequestOptions,
};
pub use session::{LogSessionExpired, SessionEvent, SessionExpiredHandler, SessionNotifier};
pub use token_store::{
    Credentials, FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError,
};
pub use transport::{ReqwestTransport, Transport};

// Common HTTP types used in the public API.
pub use reqwest::header;
pub use reqwest::{Method, StatusCode};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AuthenticatedHttpClient, ClientConfig, ClientError, ClientResult, Credentials,
        HttpRequest, HttpResponse, MultipartForm, RequestBody, RequestOptions,
        SessionExpiredHandler, TokenStore, Transport,
    };
}
