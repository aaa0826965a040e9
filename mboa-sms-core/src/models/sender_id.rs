use super::optional;
use crate::errors::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 11;

/// Review state of a sender ID request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderIdStatus {
    /// Awaiting administrator review.
    #[serde(alias = "PENDING")]
    Pending,
    /// Usable for sending.
    #[serde(alias = "APPROVED")]
    Approved,
    /// Refused.
    #[serde(alias = "REJECTED")]
    Rejected,
}

impl SenderIdStatus {
    /// Query-string value for filtering.
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderIdStatus::Pending => "pending",
            SenderIdStatus::Approved => "approved",
            SenderIdStatus::Rejected => "rejected",
        }
    }
}

/// Alphanumeric originator shown on the recipient's handset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderId {
    /// Sender ID record ID.
    pub id: String,
    /// Originator text.
    pub name: String,
    /// Review state.
    pub status: SenderIdStatus,
    /// Why the request was refused.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Requesting account.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Request time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SenderId {
    /// Whether messages may be sent with this originator.
    pub fn is_usable(&self) -> bool {
        self.status == SenderIdStatus::Approved
    }
}

/// Payload for requesting a new sender ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderIdInput {
    /// Requested originator text.
    pub name: String,
    /// What the sender will be used for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl SenderIdInput {
    /// Create a request for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            purpose: None,
        }
    }

    /// Set the purpose.
    #[must_use]
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Check the 3-11 alphanumeric rule (at least one letter).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSenderName`] when the rule is not met.
    pub fn validate(self) -> CoreResult<Self> {
        let name = self.name.trim().to_string();
        let len = name.chars().count();

        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(CoreError::invalid_sender_name(
                name,
                format!("must be {MIN_LEN} to {MAX_LEN} characters"),
            ));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::invalid_sender_name(
                name,
                "only letters and digits are allowed",
            ));
        }
        if !name.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::invalid_sender_name(
                name,
                "must contain at least one letter",
            ));
        }

        Ok(Self {
            name,
            purpose: optional(self.purpose.as_deref()),
        })
    }
}
