//! Composition root for a dashboard session.
//!
//! [`Dashboard`] wires the configuration, token store, session notifier,
//! authenticated client and services together, and keeps the signed-in
//! profile so navigation can be guarded by role.

use anyhow::Context;
use mboa_sms_api::{resolve_route, ApiResult, LoginCredentials, MboaSmsApi, RouteDecision};
use mboa_sms_core::User;
use mboa_sms_http::{
    AuthenticatedHttpClient, ClientBuilder, ClientConfig, SessionEvent, SessionNotifier, Transport,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// A dashboard session: the services plus the signed-in user.
#[derive(Debug, Clone)]
pub struct Dashboard {
    api: MboaSmsApi,
    notifier: SessionNotifier,
    user: Arc<RwLock<Option<User>>>,
}

impl Dashboard {
    /// Build from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is missing or invalid, or the token file
    /// cannot be read.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Dashboard::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config = ClientConfig::from_lookup(lookup).context("invalid client configuration")?;
        Self::from_config(config)
    }

    /// Build over the network transport described by `config`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client or token store cannot be created.
    pub fn from_config(config: ClientConfig) -> anyhow::Result<Self> {
        Self::assemble(AuthenticatedHttpClient::builder().config(config))
    }

    /// Build over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Fails when the token store cannot be created.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> anyhow::Result<Self> {
        Self::assemble(
            AuthenticatedHttpClient::builder()
                .config(config)
                .shared_transport(transport),
        )
    }

    fn assemble(builder: ClientBuilder) -> anyhow::Result<Self> {
        let notifier = SessionNotifier::default();
        let client = builder
            .on_session_expired(notifier.clone())
            .build()
            .context("failed to build the HTTP client")?;

        info!(
            authenticated = client.is_authenticated(),
            refresh_path = client.refresh_path(),
            "Dashboard ready"
        );
        Ok(Self {
            api: MboaSmsApi::new(client),
            notifier,
            user: Arc::new(RwLock::new(None)),
        })
    }

    /// The services.
    pub fn api(&self) -> &MboaSmsApi {
        &self.api
    }

    /// Receive [`SessionEvent::Expired`] whenever the session cannot be renewed.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.notifier.subscribe()
    }

    /// Sign in and remember the profile.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<User> {
        let user = self.api.session.login(credentials).await?;
        *self.user.write() = Some(user.clone());
        Ok(user)
    }

    /// Sign out and forget the profile.
    pub async fn logout(&self) {
        self.api.session.logout().await;
        self.user.write().take();
    }

    /// Reload the profile for stored tokens, e.g. after a restart.
    ///
    /// Returns `None` when there is no session or it could not be renewed.
    pub async fn restore(&self) -> ApiResult<Option<User>> {
        if !self.api.session.is_authenticated() {
            return Ok(None);
        }
        match self.api.session.me().await {
            Ok(user) => {
                *self.user.write() = Some(user.clone());
                Ok(Some(user))
            }
            Err(e) if e.is_unauthenticated() => {
                debug!("Stored session could not be renewed");
                self.user.write().take();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The signed-in user, if the session is still valid.
    ///
    /// Expiry clears the tokens, so a remembered profile without tokens is
    /// treated as signed out.
    pub fn current_user(&self) -> Option<User> {
        if self.api.session.is_authenticated() {
            self.user.read().clone()
        } else {
            None
        }
    }

    /// Decide whether the current user may open `path`.
    pub fn navigate(&self, path: &str) -> RouteDecision {
        resolve_route(path, self.current_user().as_ref())
    }
}
