//! Owned request and response values passed through the pipeline and transport.
//!
//! Requests are plain data so that a request parked behind a token refresh can
//! be replayed verbatim with a new `Authorization` header.

use crate::error::{ClientError, ClientResult, TransportError};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// An outgoing request, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Path such as `/contacts/42`, or an absolute URL.
    pub path: String,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// Request headers.
    pub headers: HeaderMap,
    /// Optional body.
    pub body: Option<RequestBody>,
    /// Per-request timeout overriding the client default.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a request with no headers or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Insert a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merge per-request options.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.headers.extend(options.headers);
        self.query.extend(options.query);
        if options.timeout.is_some() {
            self.timeout = options.timeout;
        }
        self
    }

    /// The bearer token carried by this request, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// Request payload.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON document.
    Json(serde_json::Value),
    /// `multipart/form-data` form.
    Multipart(MultipartForm),
    /// Raw bytes; the caller should supply a `Content-Type`.
    Raw(Bytes),
}

impl RequestBody {
    /// Serialise a value as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Serialization`] if the value cannot be serialised.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ClientResult<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Whether this is a multipart form.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        Self::Multipart(form)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Cloneable multipart form, converted to a reqwest form at dispatch time.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

/// One field of a [`MultipartForm`].
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FormValue,
}

/// Value of a form field.
#[derive(Debug, Clone)]
pub enum FormValue {
    /// Plain text.
    Text(String),
    /// Uploaded file.
    File {
        /// File name sent to the server.
        file_name: String,
        /// MIME type, e.g. `text/csv`.
        content_type: Option<String>,
        /// File contents.
        bytes: Bytes,
    },
}

impl MultipartForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<&mime::Mime>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                content_type: content_type.map(ToString::to_string),
                bytes: bytes.into(),
            },
        });
        self
    }

    /// Form fields in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Look up a text field.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.value {
            FormValue::Text(v) if p.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    /// Build the reqwest form.
    pub(crate) fn to_reqwest(&self) -> Result<reqwest::multipart::Form, TransportError> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match &part.value {
                FormValue::Text(v) => form.text(part.name.clone(), v.clone()),
                FormValue::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let mut file = reqwest::multipart::Part::bytes(bytes.to_vec())
                        .file_name(file_name.clone());
                    if let Some(ct) = content_type {
                        file = file.mime_str(ct).map_err(TransportError::from)?;
                    }
                    form.part(part.name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

/// Per-request options merged into an [`HttpRequest`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers.
    pub headers: HeaderMap,
    /// Extra query pairs.
    pub query: Vec<(String, String)>,
    /// Timeout override.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a query pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query pairs.
    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Override the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A received HTTP response of any status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Create an empty-bodied response.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), Bytes::new())
    }

    /// Create a JSON response.
    pub fn json_body(status: StatusCode, value: &serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Self::new(status, headers, value.to_string())
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as lossy UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body. An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(ClientError::Decode)
    }

    /// Turn a non-2xx response into [`ClientError::HttpStatus`].
    ///
    /// # Errors
    ///
    /// Returns the status error for any non-2xx status, 401 included.
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(ClientError::HttpStatus {
            status: self.status.as_u16(),
            body: self.text(),
            headers: self.headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_with_options_merges() {
        let request = HttpRequest::new(Method::GET, "/contacts").with_options(
            RequestOptions::new()
                .query("page", "2")
                .header(
                    HeaderName::from_static("accept-language"),
                    HeaderValue::from_static("fr"),
                )
                .timeout(Duration::from_secs(5)),
        );

        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(request.headers["accept-language"], "fr");
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_bearer_token() {
        let request = HttpRequest::new(Method::GET, "/me").header(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer abc"),
        );
        assert_eq!(request.bearer_token(), Some("abc"));
        assert_eq!(HttpRequest::new(Method::GET, "/me").bearer_token(), None);
    }

    #[test]
    fn test_json_empty_body_is_null() {
        let response = HttpResponse::empty(StatusCode::NO_CONTENT);
        let unit: () = response.json().unwrap();
        assert_eq!(unit, ());
        let none: Option<u32> = response.json().unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_json_decode_error() {
        let response = HttpResponse::new(StatusCode::OK, HeaderMap::new(), "not json");
        let err = response.json::<u32>().unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_error_for_status() {
        let ok = HttpResponse::json_body(StatusCode::OK, &json!({"ok": true}));
        assert!(ok.error_for_status().is_ok());

        let err = HttpResponse::new(StatusCode::CONFLICT, HeaderMap::new(), "duplicate")
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "HTTP error 409: duplicate");
    }

    #[test]
    fn test_multipart_form() {
        let form = MultipartForm::new()
            .text("groupId", "g1")
            .file("file", "contacts.csv", Some(&mime::TEXT_CSV), "name,phone\n");

        assert_eq!(form.parts().len(), 2);
        assert_eq!(form.text_value("groupId"), Some("g1"));
        assert_eq!(form.text_value("file"), None);
        assert!(form.to_reqwest().is_ok());
        assert!(RequestBody::from(form).is_multipart());
    }
}
