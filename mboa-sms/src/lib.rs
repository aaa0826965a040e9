//! # mboa-sms - MboaSMS dashboard client
//!
//! A Rust client for the MboaSMS bulk SMS platform: an authenticated HTTP
//! client that renews expired sessions transparently, typed services for every
//! dashboard resource, and role-based route guarding.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mboa_sms::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     mboa_sms::telemetry::init()?;
//!
//!     let dashboard = Dashboard::from_env()?;
//!     let mut expired = dashboard.subscribe();
//!
//!     dashboard
//!         .login(&LoginCredentials::new("awa@mboa.cm", "secret"))
//!         .await?;
//!     let contacts = dashboard.api().contacts.list(&PageQuery::new()).await?;
//!     println!("{} contacts", contacts.total);
//!
//!     tokio::spawn(async move {
//!         while expired.recv().await.is_ok() {
//!             eprintln!("Session expired, please sign in again");
//!         }
//!     });
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`mboa_sms_core`] - domain models, phone numbers, SMS segments, roles
//! - [`mboa_sms_http`] - transport, token stores and the authenticated client
//! - [`mboa_sms_api`] - typed REST services and route guarding
//!
//! ## Configuration
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MBOA_SMS_API_URL` | API base URL | required |
//! | `MBOA_SMS_TIMEOUT_SECS` | request timeout | `30` |
//! | `MBOA_SMS_REFRESH_PATH` | token refresh endpoint | `/auth/refresh` |
//! | `MBOA_SMS_TOKEN_FILE` | persist tokens to this file | in memory |
//! | `MBOA_SMS_LOG_JSON` | JSON log lines | off |
//! | `RUST_LOG` | log filter | `info` |

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod dashboard;
pub mod telemetry;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Domain types.
pub use mboa_sms_core as core;

/// Authenticated HTTP client.
pub use mboa_sms_http as http;

/// REST services.
pub use mboa_sms_api as api;

// ============================================================================
// Type Re-exports (Flat)
// ============================================================================

pub use dashboard::Dashboard;

// Domain
pub use mboa_sms_core::{
    Contact, CoreError, Group, Message, MessageStatus, NewMessage, Operator, Page, PageQuery,
    PhoneNumber, PricingPlan, Recharge, RechargeStatus, Role, Section, SenderId, SenderIdStatus,
    SmsSegments, User,
};

// HTTP
pub use mboa_sms_http::{
    AuthenticatedHttpClient, ClientConfig, ClientError, ClientResult, Credentials,
    SessionEvent, SessionExpiredHandler, SessionNotifier, TokenStore, Transport,
};

// Services
pub use mboa_sms_api::{
    resolve_route, ApiError, ApiResult, LoginCredentials, MboaSmsApi, RouteDecision,
};

/// Prelude for common imports.
///
/// ```ignore
/// use mboa_sms::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Dashboard;
    pub use mboa_sms_api::prelude::*;
    pub use mboa_sms_core::prelude::*;
    pub use mboa_sms_http::prelude::*;
    pub use mboa_sms_http::{SessionEvent, SessionNotifier};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
