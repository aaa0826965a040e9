//! Message history and sending.

use crate::error::ApiResult;
use mboa_sms_core::{Message, MessageStatus, NewMessage, Page, PageQuery, SmsEncoding};
use mboa_sms_http::{AuthenticatedHttpClient, Method, RequestOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    #[serde(flatten)]
    message: &'a NewMessage,
    parts: usize,
    encoding: SmsEncoding,
}

/// Server acknowledgement of a send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    /// Campaign or message ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Number of recipients the server resolved, groups included.
    #[serde(default)]
    pub recipients: u64,
    /// Parts billed per recipient.
    #[serde(default)]
    pub parts: u64,
    /// Total cost in XAF.
    #[serde(default)]
    pub cost: Option<f64>,
    /// Initial status.
    #[serde(default)]
    pub status: Option<MessageStatus>,
}

/// Message endpoints.
#[derive(Debug, Clone)]
pub struct MessagesService {
    client: AuthenticatedHttpClient,
}

impl MessagesService {
    /// Create the service.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// One page of message history, optionally filtered by status.
    pub async fn list(
        &self,
        query: &PageQuery,
        status: Option<MessageStatus>,
    ) -> ApiResult<Page<Message>> {
        let mut query = query.clone();
        if let Some(status) = status {
            query = query.filter("status", status.as_str());
        }
        let options = RequestOptions::new().query_pairs(query.to_pairs());
        Ok(self
            .client
            .request(Method::GET, "/messages", None, options)
            .await?)
    }

    /// A single message.
    pub async fn get(&self, id: &str) -> ApiResult<Message> {
        Ok(self.client.get(&format!("/messages/{id}")).await?)
    }

    /// Send a message. Recipients are normalised to E.164 and the segment
    /// count is sent along so the server can check the balance.
    pub async fn send(&self, message: NewMessage) -> ApiResult<SendReceipt> {
        let message = message.validate()?;
        let segments = message.segments();
        let body = SendRequest {
            message: &message,
            parts: segments.parts,
            encoding: segments.encoding,
        };

        let receipt: SendReceipt = self.client.post("/messages/send", &body).await?;
        info!(
            sender = %message.sender,
            recipients = message.recipients.len(),
            groups = message.group_ids.len(),
            parts = segments.parts,
            "Message submitted"
        );
        Ok(receipt)
    }
}
