//! Sender ID requests and review.

use crate::error::ApiResult;
use mboa_sms_core::{Page, PageQuery, SenderId, SenderIdInput, SenderIdStatus};
use mboa_sms_http::{AuthenticatedHttpClient, Method, RequestBody, RequestOptions};
use serde::de::IgnoredAny;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct Rejection<'a> {
    reason: &'a str,
}

/// Sender ID endpoints.
#[derive(Debug, Clone)]
pub struct SenderIdsService {
    client: AuthenticatedHttpClient,
}

impl SenderIdsService {
    /// Create the service.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// One page of sender IDs, optionally filtered by status.
    pub async fn list(
        &self,
        query: &PageQuery,
        status: Option<SenderIdStatus>,
    ) -> ApiResult<Page<SenderId>> {
        let mut query = query.clone();
        if let Some(status) = status {
            query = query.filter("status", status.as_str());
        }
        let options = RequestOptions::new().query_pairs(query.to_pairs());
        Ok(self
            .client
            .request(Method::GET, "/sender-ids", None, options)
            .await?)
    }

    /// Request a new sender ID.
    pub async fn request(&self, input: SenderIdInput) -> ApiResult<SenderId> {
        let input = input.validate()?;
        let sender: SenderId = self.client.post("/sender-ids", &input).await?;
        info!(sender_id = %sender.id, name = %sender.name, "Sender ID requested");
        Ok(sender)
    }

    /// Approve a pending request (administrators).
    pub async fn approve(&self, id: &str) -> ApiResult<SenderId> {
        Ok(self
            .client
            .request(
                Method::PATCH,
                &format!("/sender-ids/{id}/approve"),
                None,
                RequestOptions::default(),
            )
            .await?)
    }

    /// Reject a pending request with a reason shown to the requester.
    pub async fn reject(&self, id: &str, reason: &str) -> ApiResult<SenderId> {
        let body = RequestBody::json(&Rejection {
            reason: reason.trim(),
        })?;
        Ok(self
            .client
            .request(
                Method::PATCH,
                &format!("/sender-ids/{id}/reject"),
                Some(body),
                RequestOptions::default(),
            )
            .await?)
    }

    /// Delete a sender ID.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete::<IgnoredAny>(&format!("/sender-ids/{id}"))
            .await?;
        Ok(())
    }
}
