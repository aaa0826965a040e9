//! Sign-in, sign-out and the current profile.

use crate::error::ApiResult;
use mboa_sms_core::User;
use mboa_sms_http::{
    AuthenticatedHttpClient, Credentials, HttpRequest, Method, RequestBody,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Email and password submitted by the login form.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

impl LoginCredentials {
    /// Create login credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(alias = "accessToken")]
    token: String,
    refresh_token: String,
    user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutRequest {
    refresh_token: String,
}

/// Session endpoints.
#[derive(Debug, Clone)]
pub struct SessionService {
    client: AuthenticatedHttpClient,
}

impl SessionService {
    /// Create the service.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// Sign in, store the returned tokens and return the profile.
    ///
    /// A 401 here means wrong credentials and is returned as a status error;
    /// it never triggers a token refresh.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<User> {
        let request = HttpRequest::new(Method::POST, "/auth/login")
            .body(RequestBody::json(credentials)?);
        let response: LoginResponse = self.client.send_once(request).await?.json()?;

        self.client
            .set_credentials(Credentials::new(response.token, response.refresh_token));
        info!(user_id = %response.user.id, role = %response.user.role, "Signed in");
        Ok(response.user)
    }

    /// Sign out. The server call is best effort; local tokens are always cleared.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.client.tokens().refresh_token() {
            let body = RequestBody::json(&LogoutRequest { refresh_token });
            let result = match body {
                Ok(body) => self
                    .client
                    .send_once(HttpRequest::new(Method::POST, "/auth/logout").body(body))
                    .await
                    .map(drop),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                debug!(error = %e, "Logout request failed; clearing tokens anyway");
            }
        }
        self.client.clear_credentials();
        info!("Signed out");
    }

    /// The signed-in user's profile.
    pub async fn me(&self) -> ApiResult<User> {
        Ok(self.client.get("/auth/me").await?)
    }

    /// Whether an access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{json_response, session_client};
    use mboa_sms_core::Role;
    use mboa_sms_http::{HttpResponse, MockTransport, StatusCode, TransportError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn backend(request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Ok(match request.path.as_str() {
            "/auth/login" => {
                let password = match &request.body {
                    Some(RequestBody::Json(body)) => body["password"].as_str().unwrap_or_default().to_string(),
                    _ => String::new(),
                };
                if password == "secret" {
                    json_response(json!({
                        "token": "A9",
                        "refreshToken": "R9",
                        "user": {"id": "u1", "name": "Awa", "email": "awa@mboa.cm", "role": "client"}
                    }))
                } else {
                    HttpResponse::json_body(StatusCode::UNAUTHORIZED, &json!({"message": "Invalid credentials"}))
                }
            }
            "/auth/logout" => HttpResponse::json_body(StatusCode::INTERNAL_SERVER_ERROR, &json!({})),
            _ => json_response(json!({"id": "u1", "email": "awa@mboa.cm", "role": "admin"})),
        })
    }

    #[tokio::test]
    async fn test_login_stores_tokens() {
        let (client, mock, store) = session_client(None, MockTransport::new(backend));
        let session = SessionService::new(client);

        let user = session
            .login(&LoginCredentials::new(" awa@mboa.cm ", "secret"))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Client);
        assert_eq!(store.credentials(), Some(Credentials::new("A9", "R9")));
        assert!(session.is_authenticated());

        let sent = &mock.calls_to("/auth/login")[0];
        assert!(matches!(
            &sent.body,
            Some(RequestBody::Json(body)) if body["email"] == "awa@mboa.cm"
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_does_not_refresh() {
        let (client, mock, store) = session_client(
            Some(Credentials::new("A1", "R1")),
            MockTransport::new(backend),
        );
        let session = SessionService::new(client);

        let err = session
            .login(&LoginCredentials::new("awa@mboa.cm", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(mock.calls_to("/auth/refresh").is_empty());
        assert_eq!(store.credentials(), Some(Credentials::new("A1", "R1")));
    }

    #[tokio::test]
    async fn test_logout_always_clears() {
        let (client, mock, store) = session_client(
            Some(Credentials::new("A1", "R1")),
            MockTransport::new(backend),
        );
        let session = SessionService::new(client);

        session.logout().await;
        assert_eq!(store.credentials(), None);
        assert!(!session.is_authenticated());
        assert_eq!(mock.calls_to("/auth/logout").len(), 1);
    }

    #[tokio::test]
    async fn test_me() {
        let (client, _mock, _store) = session_client(
            Some(Credentials::new("A1", "R1")),
            MockTransport::new(backend),
        );
        let user = SessionService::new(client).me().await.unwrap();
        assert!(user.role.is_admin());
    }

    #[test]
    fn test_password_redacted() {
        let debug = format!("{:?}", LoginCredentials::new("a@b.cm", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
