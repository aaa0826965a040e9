//! Client configuration.

use crate::error::{ClientError, ClientResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Base URL of the API, required by [`ClientConfig::from_env`].
pub const ENV_API_URL: &str = "MBOA_SMS_API_URL";
/// Request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "MBOA_SMS_TIMEOUT_SECS";
/// Refresh endpoint path.
pub const ENV_REFRESH_PATH: &str = "MBOA_SMS_REFRESH_PATH";
/// Token file location.
pub const ENV_TOKEN_FILE: &str = "MBOA_SMS_TOKEN_FILE";

/// Default refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL; request paths are appended to it.
    pub base_url: Url,
    /// Default request timeout.
    pub timeout: Duration,
    /// Path of the token refresh endpoint.
    pub refresh_path: String,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Headers sent with every request.
    pub default_headers: Vec<(String, String)>,
    /// Where to persist tokens; `None` keeps them in memory.
    pub token_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a config for `base_url` with defaults.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            user_agent: concat!("mboa-sms/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: Vec::new(),
            token_file: None,
        }
    }

    /// Parse a base URL string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] for an invalid URL.
    pub fn parse(base_url: &str) -> ClientResult<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| ClientError::configuration(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self::new(url))
    }

    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `MBOA_SMS_API_URL` is missing or any value is malformed.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let base_url = lookup(ENV_API_URL)
            .ok_or_else(|| ClientError::configuration(format!("{ENV_API_URL} is not set")))?;
        let mut config = Self::parse(&base_url)?;

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::configuration(format!("{ENV_TIMEOUT_SECS} must be a number of seconds"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(ENV_REFRESH_PATH).filter(|p| !p.trim().is_empty()) {
            config.refresh_path = path;
        }
        if let Some(file) = lookup(ENV_TOKEN_FILE).filter(|p| !p.trim().is_empty()) {
            config.token_file = Some(PathBuf::from(file));
        }

        Ok(config)
    }

    /// Set the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the refresh endpoint path.
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Persist tokens to a file.
    #[must_use]
    pub fn token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// `Accept: application/json` plus the configured default headers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] for an invalid header name or value.
    pub fn header_map(&self) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::configuration(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::configuration(format!("invalid value for '{name}': {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Resolve a request path against the base URL.
    ///
    /// Paths are appended to the base path (`/api` + `/contacts` gives
    /// `/api/contacts`); absolute `http(s)` URLs are used unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the result is not a valid URL.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        join_url(&self.base_url, path)
            .map_err(|e| ClientError::configuration(format!("invalid path '{path}': {e}")))
    }
}

/// Append `path` to `base`, keeping the base path.
pub(crate) fn join_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return Url::parse(path);
    }
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined)
}
