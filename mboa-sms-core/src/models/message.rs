use super::required;
use crate::errors::{CoreError, CoreResult};
use crate::phone::PhoneNumber;
use crate::sms::SmsSegments;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Queued for dispatch.
    #[serde(alias = "PENDING", alias = "queued")]
    Pending,
    /// Handed to the carrier.
    #[serde(alias = "SENT")]
    Sent,
    /// Delivery report received.
    #[serde(alias = "DELIVERED")]
    Delivered,
    /// Dispatch or delivery failed.
    #[serde(alias = "FAILED")]
    Failed,
}

impl MessageStatus {
    /// Query-string value for filtering.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Failed => "failed",
        }
    }
}

/// One entry of the message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID.
    pub id: String,
    /// Sender ID text.
    pub sender: String,
    /// Recipient phone number.
    pub recipient: String,
    /// Body.
    pub content: String,
    /// Delivery state.
    pub status: MessageStatus,
    /// Billed parts.
    #[serde(default)]
    pub parts: u32,
    /// Cost in XAF.
    #[serde(default)]
    pub cost: Option<f64>,
    /// Submission time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for sending an SMS campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    /// Approved sender ID text.
    pub sender: String,
    /// Individual recipients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
    /// Groups to broadcast to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<String>,
    /// Body.
    pub content: String,
    /// Deferred send time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewMessage {
    /// Create a message from a sender and body.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipients: Vec::new(),
            group_ids: Vec::new(),
            content: content.into(),
            scheduled_at: None,
        }
    }

    /// Add a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    /// Add a group.
    #[must_use]
    pub fn to_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_ids.push(group_id.into());
        self
    }

    /// Schedule for later.
    #[must_use]
    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(at);
        self
    }

    /// Segment count of the body.
    pub fn segments(&self) -> SmsSegments {
        SmsSegments::measure(&self.content)
    }

    /// Normalise recipients to E.164 (deduplicated, order kept) and check
    /// that there is a sender, a body and at least one target.
    ///
    /// # Errors
    ///
    /// Fails on blank sender or body, an invalid recipient, or no target.
    pub fn validate(self) -> CoreResult<Self> {
        let sender = required(&self.sender, "sender")?;
        if self.content.trim().is_empty() {
            return Err(CoreError::EmptyField("content"));
        }

        let mut recipients: Vec<String> = Vec::with_capacity(self.recipients.len());
        for raw in &self.recipients {
            let e164 = PhoneNumber::parse(raw)?.e164();
            if !recipients.contains(&e164) {
                recipients.push(e164);
            }
        }

        if recipients.is_empty() && self.group_ids.is_empty() {
            return Err(CoreError::validation(
                "at least one recipient or group is required",
            ));
        }

        Ok(Self {
            sender,
            recipients,
            ..self
        })
    }
}
