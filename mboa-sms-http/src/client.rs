//! Authenticated HTTP client.
//!
//! Requests go through the [`RequestPipeline`] and the [`Transport`]. A 401
//! starts (or joins) one refresh episode shared by every request that fails
//! while it is in flight. The episode runs on its own task so a caller that
//! drops its future never strands the queue.

use crate::config::{ClientConfig, DEFAULT_REFRESH_PATH};
use crate::error::{ClientError, ClientResult};
use crate::pipeline::{RequestPipeline, RequestStage};
use crate::refresh::{Admission, PendingRequest, RefreshRequest, RefreshResponse, RefreshState};
use crate::request::{HttpRequest, HttpResponse, MultipartForm, RequestBody, RequestOptions};
use crate::session::{LogSessionExpired, SessionExpiredHandler};
use crate::token_store::{Credentials, FileTokenStore, MemoryTokenStore, TokenStore};
use crate::transport::{ReqwestTransport, Transport};
use futures::future::join_all;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// HTTP client that attaches bearer tokens and recovers from expired ones.
///
/// Cloning is cheap; clones share the token store and the refresh state.
#[derive(Clone)]
pub struct AuthenticatedHttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    on_expired: Arc<dyn SessionExpiredHandler>,
    pipeline: RequestPipeline,
    refresh_pipeline: RequestPipeline,
    refresh_path: String,
    state: Mutex<RefreshState>,
}

impl AuthenticatedHttpClient {
    /// Create a client over a reqwest transport.
    ///
    /// # Errors
    ///
    /// Fails if the transport or the token file cannot be set up.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::builder().config(config).build()
    }

    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// GET `path` and decode the body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_with(path, RequestOptions::default()).await
    }

    /// GET `path` with per-request options.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        self.request(Method::GET, path, None, options).await
    }

    /// POST a JSON body to `path`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_with(path, body, RequestOptions::default()).await
    }

    /// POST a JSON body to `path` with per-request options.
    pub async fn post_with<B, T>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::json(body)?;
        self.request(Method::POST, path, Some(body), options).await
    }

    /// POST a multipart form to `path`.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> ClientResult<T> {
        self.request(Method::POST, path, Some(form.into()), RequestOptions::default())
            .await
    }

    /// PUT a JSON body to `path`.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.put_with(path, body, RequestOptions::default()).await
    }

    /// PUT a JSON body to `path` with per-request options.
    pub async fn put_with<B, T>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::json(body)?;
        self.request(Method::PUT, path, Some(body), options).await
    }

    /// DELETE `path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.delete_with(path, RequestOptions::default()).await
    }

    /// DELETE `path` with per-request options.
    pub async fn delete_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        self.request(Method::DELETE, path, None, options).await
    }

    /// Issue a request with an optional body and options, decoding the body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let mut request = HttpRequest::new(method, path).with_options(options);
        request.body = body;
        self.send(request).await?.json()
    }

    /// Issue a request, recovering from one expired access token.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Transport`] when no response arrived
    /// - [`ClientError::HttpStatus`] for non-2xx responses, including a 401
    ///   received again after a refresh
    /// - [`ClientError::Unauthenticated`] when the session could not be renewed
    pub async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let prepared = self.inner.pipeline.apply(&request);
        let response = self.inner.transmit(&prepared).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return response.error_for_status();
        }

        let sent_token = prepared.bearer_token().map(str::to_owned);
        self.inner.clone().recover(request, sent_token).await
    }

    /// Issue a request without 401 recovery.
    ///
    /// Used for calls where a 401 means bad input rather than an expired
    /// token, such as signing in.
    pub async fn send_once(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        self.inner.replay(&request).await
    }

    /// Store credentials obtained by signing in.
    pub fn set_credentials(&self, credentials: Credentials) {
        self.inner.tokens.set_tokens(credentials);
    }

    /// Forget the stored credentials.
    pub fn clear_credentials(&self) {
        self.inner.tokens.clear();
    }

    /// Whether an access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.inner.tokens.access_token().is_some()
    }

    /// The token store.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Whether a refresh episode is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.state.lock().in_progress()
    }

    /// Number of requests parked behind the current refresh.
    pub fn queued_requests(&self) -> usize {
        self.inner.state.lock().queued()
    }

    /// Path of the refresh endpoint.
    pub fn refresh_path(&self) -> &str {
        &self.inner.refresh_path
    }
}

impl fmt::Debug for AuthenticatedHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedHttpClient")
            .field("pipeline", &self.inner.pipeline)
            .field("refresh_path", &self.inner.refresh_path)
            .finish_non_exhaustive()
    }
}

impl Inner {
    async fn transmit(&self, prepared: &HttpRequest) -> ClientResult<HttpResponse> {
        debug!(method = %prepared.method, path = %prepared.path, "Sending request");
        match self.transport.send(prepared).await {
            Ok(response) => {
                debug!(
                    method = %prepared.method,
                    path = %prepared.path,
                    status = response.status.as_u16(),
                    "Received response"
                );
                Ok(response)
            }
            Err(e) => {
                warn!(method = %prepared.method, path = %prepared.path, error = %e, "Request failed");
                Err(e.into())
            }
        }
    }

    /// Send with the current token; a 401 is returned as an error.
    async fn replay(&self, request: &HttpRequest) -> ClientResult<HttpResponse> {
        let prepared = self.pipeline.apply(request);
        self.transmit(&prepared).await?.error_for_status()
    }

    async fn recover(
        self: Arc<Self>,
        request: HttpRequest,
        sent_token: Option<String>,
    ) -> ClientResult<HttpResponse> {
        let (reply, rx) = oneshot::channel();
        let pending = PendingRequest { request, reply };

        let admission = {
            let mut state = self.state.lock();
            let current = self.tokens.access_token();
            let has_refresh_token = self.tokens.refresh_token().is_some();
            let admission = state.admit(
                pending,
                sent_token.as_deref(),
                current.as_deref(),
                has_refresh_token,
            );
            if matches!(admission, Admission::Wait) {
                debug!(queued = state.queued(), "Waiting for token refresh");
            }
            admission
        };

        match admission {
            Admission::Lead => {
                debug!(path = %self.refresh_path, "Access token rejected; refreshing");
                tokio::spawn(self.clone().run_episode());
            }
            Admission::Wait => {}
            Admission::RetryNow(pending) => {
                debug!("Access token already replaced; retrying");
                return self.replay(&pending.request).await;
            }
            Admission::NoRefreshToken => {
                self.expire(0);
                return Err(ClientError::Unauthenticated);
            }
            Admission::AlreadyExpired => {
                debug!("Session already expired");
                return Err(ClientError::Unauthenticated);
            }
        }

        rx.await.unwrap_or(Err(ClientError::RefreshInterrupted))
    }

    async fn run_episode(self: Arc<Self>) {
        match self.refresh().await {
            Ok(credentials) => {
                // Persist before clearing the flag so no request sees the old token.
                self.tokens.set_tokens(credentials);
                let pending = self.state.lock().finish(true);
                info!(queued = pending.len(), "Access token refreshed; replaying requests");

                let replays = pending.into_iter().map(|p| {
                    let inner = self.clone();
                    async move {
                        let result = inner.replay(&p.request).await;
                        // The caller may have gone away.
                        let _ = p.reply.send(result);
                    }
                });
                join_all(replays).await;
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                self.tokens.clear();
                let pending = self.state.lock().finish(false);
                self.expire(pending.len());
                for p in pending {
                    let _ = p.reply.send(Err(ClientError::Unauthenticated));
                }
            }
        }
    }

    async fn refresh(&self) -> ClientResult<Credentials> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or(ClientError::Unauthenticated)?;

        let request = HttpRequest::new(Method::POST, self.refresh_path.clone()).body(
            RequestBody::json(&RefreshRequest {
                refresh_token: &refresh_token,
            })?,
        );
        let prepared = self.refresh_pipeline.apply(&request);
        let response = self.transmit(&prepared).await?.error_for_status()?;
        let body: RefreshResponse = response.json()?;

        Ok(Credentials::new(
            body.token,
            body.refresh_token.unwrap_or(refresh_token),
        ))
    }

    fn expire(&self, queued: usize) {
        self.tokens.clear();
        warn!(queued, "Session expired");
        self.on_expired.on_session_expired();
    }
}

/// Builder for [`AuthenticatedHttpClient`].
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn Transport>>,
    tokens: Option<Arc<dyn TokenStore>>,
    on_expired: Option<Arc<dyn SessionExpiredHandler>>,
    refresh_path: Option<String>,
    default_headers: HeaderMap,
    stages: Vec<Arc<dyn RequestStage>>,
}

impl ClientBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this transport instead of reqwest.
    #[must_use]
    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Use a shared transport.
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use this token store.
    #[must_use]
    pub fn token_store(self, store: impl TokenStore + 'static) -> Self {
        self.shared_token_store(Arc::new(store))
    }

    /// Use a shared token store.
    #[must_use]
    pub fn shared_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(store);
        self
    }

    /// Call `handler` when a session cannot be renewed.
    #[must_use]
    pub fn on_session_expired(self, handler: impl SessionExpiredHandler + 'static) -> Self {
        self.shared_session_handler(Arc::new(handler))
    }

    /// Use a shared session-expired handler.
    #[must_use]
    pub fn shared_session_handler(mut self, handler: Arc<dyn SessionExpiredHandler>) -> Self {
        self.on_expired = Some(handler);
        self
    }

    /// Override the refresh endpoint path.
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Send a header with every request.
    #[must_use]
    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Append a stage to the authenticated pipeline.
    #[must_use]
    pub fn stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when neither a transport nor a
    /// config was given, or when the config is unusable.
    pub fn build(self) -> ClientResult<AuthenticatedHttpClient> {
        let transport: Arc<dyn Transport> = match (self.transport, &self.config) {
            (Some(transport), _) => transport,
            (None, Some(config)) => Arc::new(ReqwestTransport::new(config)?),
            (None, None) => {
                return Err(ClientError::configuration(
                    "either a transport or a config is required",
                ))
            }
        };

        let tokens: Arc<dyn TokenStore> = match (self.tokens, self.config.as_ref()) {
            (Some(tokens), _) => tokens,
            (None, Some(ClientConfig {
                token_file: Some(path),
                ..
            })) => Arc::new(FileTokenStore::open(path).map_err(|e| {
                ClientError::configuration(format!("token file {}: {e}", path.display()))
            })?),
            (None, _) => Arc::new(MemoryTokenStore::new()),
        };

        let mut headers = match &self.config {
            Some(config) => config.header_map()?,
            None => {
                let mut headers = HeaderMap::new();
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                headers
            }
        };
        headers.extend(self.default_headers);

        let refresh_path = self
            .refresh_path
            .or_else(|| self.config.as_ref().map(|c| c.refresh_path.clone()))
            .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string());

        let mut pipeline = RequestPipeline::standard(headers.clone(), tokens.clone());
        for stage in self.stages {
            pipeline = pipeline.shared_stage(stage);
        }

        Ok(AuthenticatedHttpClient {
            inner: Arc::new(Inner {
                transport,
                tokens,
                on_expired: self
                    .on_expired
                    .unwrap_or_else(|| Arc::new(LogSessionExpired)),
                pipeline,
                refresh_pipeline: RequestPipeline::anonymous(headers),
                refresh_path,
                state: Mutex::new(RefreshState::default()),
            }),
        })
    }
}
