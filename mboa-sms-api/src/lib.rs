//! # mboa-sms-api
//!
//! Typed services over the MboaSMS REST API.
//!
//! Every service is a cheap clone holding an [`AuthenticatedHttpClient`], so
//! token refresh and session expiry are handled once, below all of them.
//! Inputs are validated with [`mboa_sms_core`] before anything is sent.
//!
//! ## Services
//!
//! - [`SessionService`]: login, logout, current profile
//! - [`ContactsService`]: address book and CSV import
//! - [`GroupsService`]: contact groups and membership
//! - [`SenderIdsService`]: sender ID requests and review
//! - [`PricingPlansService`]: volume tiers
//! - [`RechargesService`]: credit purchases and review
//! - [`MessagesService`]: history and sending
//!
//! [`resolve_route`] guards dashboard navigation by role.
//!
//! ## Example
//!
//! ```ignore
//! use mboa_sms_api::{LoginCredentials, MboaSmsApi};
//! use mboa_sms_core::{NewMessage, PageQuery};
//!
//! let api = MboaSmsApi::new(client);
//! let user = api.session.login(&LoginCredentials::new("awa@mboa.cm", "secret")).await?;
//!
//! let contacts = api.contacts.list(&PageQuery::new().search("awa")).await?;
//! api.messages
//!     .send(NewMessage::new("MBOASHOP", "Bonjour!").to(&contacts.data[0].phone))
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod contacts;
pub mod error;
pub mod groups;
pub mod messages;
pub mod pricing_plans;
pub mod recharges;
pub mod routing;
pub mod sender_ids;

// Re-exports
pub use auth::{LoginCredentials, SessionService};
pub use contacts::{ContactsService, ImportSummary};
pub use error::{ApiError, ApiResult};
pub use groups::GroupsService;
pub use messages::{MessagesService, SendReceipt};
pub use pricing_plans::PricingPlansService;
pub use recharges::{PaymentProof, RechargesService};
pub use routing::{resolve_route, RouteDecision, LOGIN_PATH, PUBLIC_PATHS};
pub use sender_ids::SenderIdsService;

use mboa_sms_http::AuthenticatedHttpClient;

/// All services over one client.
#[derive(Debug, Clone)]
pub struct MboaSmsApi {
    /// Session endpoints.
    pub session: SessionService,
    /// Contact endpoints.
    pub contacts: ContactsService,
    /// Group endpoints.
    pub groups: GroupsService,
    /// Sender ID endpoints.
    pub sender_ids: SenderIdsService,
    /// Pricing plan endpoints.
    pub pricing_plans: PricingPlansService,
    /// Recharge endpoints.
    pub recharges: RechargesService,
    /// Message endpoints.
    pub messages: MessagesService,
    client: AuthenticatedHttpClient,
}

impl MboaSmsApi {
    /// Create every service over `client`.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self {
            session: SessionService::new(client.clone()),
            contacts: ContactsService::new(client.clone()),
            groups: GroupsService::new(client.clone()),
            sender_ids: SenderIdsService::new(client.clone()),
            pricing_plans: PricingPlansService::new(client.clone()),
            recharges: RechargesService::new(client.clone()),
            messages: MessagesService::new(client.clone()),
            client,
        }
    }

    /// The shared client.
    pub fn client(&self) -> &AuthenticatedHttpClient {
        &self.client
    }
}

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        resolve_route, ApiError, ApiResult, LoginCredentials, MboaSmsApi, RouteDecision,
    };
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::service_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_services_share_one_client() {
        let (client, _mock) = service_client(json!({}));
        let api = MboaSmsApi::new(client);
        assert!(api.session.is_authenticated());

        api.client().clear_credentials();
        assert!(!api.session.is_authenticated());
    }
}
