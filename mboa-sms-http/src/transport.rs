//! Transport implementations.
//!
//! A [`Transport`] performs exactly one network exchange. It returns every
//! HTTP response as `Ok`, whatever the status; only a missing response is an
//! error. Status handling and token refresh live in the client.

use crate::config::{join_url, ClientConfig};
use crate::error::{ClientError, ClientResult, TransportError};
use crate::pipeline::MULTIPART_FORM_DATA;
use crate::request::{HttpRequest, HttpResponse, RequestBody};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

/// Trait for HTTP transports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a prepared request and return the response, whatever its status.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the reqwest client cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = join_url(&self.base_url, &request.path)
            .map_err(|e| TransportError::invalid_request(format!("{}: {e}", request.path)))?;

        let mut headers = request.headers.clone();
        let mut builder = self.client.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        match &request.body {
            None => {}
            Some(RequestBody::Json(value)) => {
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| TransportError::invalid_request(e.to_string()))?;
                builder = builder.body(bytes);
            }
            Some(RequestBody::Raw(bytes)) => {
                builder = builder.body(bytes.clone());
            }
            Some(RequestBody::Multipart(form)) => {
                // reqwest writes its own header carrying the boundary.
                let bare = headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case(MULTIPART_FORM_DATA));
                if bare {
                    headers.remove(CONTENT_TYPE);
                }
                builder = builder.multipart(form.to_reqwest()?);
            }
        }

        Ok(builder.headers(headers))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.build(request)?.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MultipartForm;
    use pretty_assertions::assert_eq;
    use reqwest::header::{HeaderValue, AUTHORIZATION};
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn transport(server: &MockServer) -> ReqwestTransport {
        let config = ClientConfig::parse(&format!("{}/api", server.uri())).unwrap();
        ReqwestTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_with_query_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer A1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = HttpRequest::new(Method::GET, "/contacts")
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer A1"));
        request.query.push(("page".into(), "2".into()));

        let response = transport(&server).await.send(&request).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json::<serde_json::Value>().unwrap()["total"], 0);
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/groups/7"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&server)
            .await;

        let response = transport(&server)
            .await
            .send(&HttpRequest::new(Method::DELETE, "/groups/7"))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.text(), "expired");
    }

    #[tokio::test]
    async fn test_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/groups"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "Clients VIP"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "g1"})))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::new(Method::POST, "/groups")
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(RequestBody::Json(json!({"name": "Clients VIP"})));

        let response = transport(&server).await.send(&request).await.unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_multipart_gets_boundary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contacts/import"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imported": 2})))
            .expect(1)
            .mount(&server)
            .await;

        let form = MultipartForm::new().file(
            "file",
            "contacts.csv",
            Some(&mime::TEXT_CSV),
            "name,phone\nA,677123456\n",
        );
        let request = HttpRequest::new(Method::POST, "/contacts/import")
            .header(CONTENT_TYPE, HeaderValue::from_static(MULTIPART_FORM_DATA))
            .body(form.into());

        let response = transport(&server).await.send(&request).await.unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let mut request = HttpRequest::new(Method::GET, "/slow");
        request.timeout = Some(Duration::from_millis(50));

        let err = transport(&server).await.send(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let config = ClientConfig::parse("http://127.0.0.1:9/api").unwrap();
        let transport = ReqwestTransport::new(&config).unwrap();

        let err = transport
            .send(&HttpRequest::new(Method::GET, "/contacts"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)));
    }
}
