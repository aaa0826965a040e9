//! Request pipeline.
//!
//! Every outgoing request passes through an ordered list of [`RequestStage`]s
//! fixed when the client is built. The standard order is:
//!
//! 1. [`DefaultHeaders`]: headers sent with every call, unless already set
//! 2. [`RequestIdStage`]: an `X-Request-Id` for log correlation
//! 3. [`AttachBearer`]: `Authorization: Bearer <token>` when a token is stored
//! 4. [`InferContentType`]: `multipart/form-data` or `application/json`

use crate::request::{HttpRequest, RequestBody};
use crate::token_store::TokenStore;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::fmt;
use std::sync::Arc;

/// Content type set for multipart bodies; the transport adds the boundary.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Request id header.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// One step of the request pipeline.
pub trait RequestStage: Send + Sync {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    /// Modify the request in place.
    fn apply(&self, request: &mut HttpRequest);
}

/// Headers added to every request that does not already carry them.
#[derive(Debug, Clone, Default)]
pub struct DefaultHeaders {
    headers: HeaderMap,
}

impl DefaultHeaders {
    /// Create the stage.
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }
}

impl RequestStage for DefaultHeaders {
    fn name(&self) -> &'static str {
        "default_headers"
    }

    fn apply(&self, request: &mut HttpRequest) {
        for (name, value) in &self.headers {
            if !request.headers.contains_key(name) {
                request.headers.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Tags each dispatch with a fresh `X-Request-Id` unless the caller set one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdStage;

impl RequestStage for RequestIdStage {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn apply(&self, request: &mut HttpRequest) {
        if request.headers.contains_key(&X_REQUEST_ID) {
            return;
        }
        let id = uuid::Uuid::new_v4().to_string();
        if let Ok(value) = HeaderValue::from_str(&id) {
            request.headers.insert(X_REQUEST_ID, value);
        }
    }
}

/// Attaches the stored access token as a bearer credential.
pub struct AttachBearer {
    store: Arc<dyn TokenStore>,
}

impl AttachBearer {
    /// Create the stage over a token store.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

impl fmt::Debug for AttachBearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachBearer").finish_non_exhaustive()
    }
}

impl RequestStage for AttachBearer {
    fn name(&self) -> &'static str {
        "attach_bearer"
    }

    fn apply(&self, request: &mut HttpRequest) {
        let Some(token) = self.store.access_token() else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Stored access token is not a valid header value; not attached");
            }
        }
    }
}

/// Sets `Content-Type` from the body kind, never overriding the caller's.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferContentType;

impl RequestStage for InferContentType {
    fn name(&self) -> &'static str {
        "infer_content_type"
    }

    fn apply(&self, request: &mut HttpRequest) {
        if request.headers.contains_key(CONTENT_TYPE) {
            return;
        }
        let content_type = match &request.body {
            None => return,
            Some(RequestBody::Multipart(_)) => MULTIPART_FORM_DATA,
            Some(_) => "application/json",
        };
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
}

/// Ordered list of stages.
#[derive(Clone, Default)]
pub struct RequestPipeline {
    stages: Vec<Arc<dyn RequestStage>>,
}

impl RequestPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default headers, request id, bearer, content type.
    pub fn standard(default_headers: HeaderMap, store: Arc<dyn TokenStore>) -> Self {
        Self::new()
            .stage(DefaultHeaders::new(default_headers))
            .stage(RequestIdStage)
            .stage(AttachBearer::new(store))
            .stage(InferContentType)
    }

    /// The standard pipeline without the bearer stage, for the refresh call.
    pub fn anonymous(default_headers: HeaderMap) -> Self {
        Self::new()
            .stage(DefaultHeaders::new(default_headers))
            .stage(RequestIdStage)
            .stage(InferContentType)
    }

    /// Append a stage.
    #[must_use]
    pub fn stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Append a shared stage.
    #[must_use]
    pub fn shared_stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Stage names in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over a copy of `request`.
    pub fn apply(&self, request: &HttpRequest) -> HttpRequest {
        let mut prepared = request.clone();
        for stage in &self.stages {
            stage.apply(&mut prepared);
        }
        prepared
    }
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
