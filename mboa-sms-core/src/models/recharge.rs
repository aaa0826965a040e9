use super::{optional, required};
use crate::errors::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of a recharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RechargeStatus {
    /// Awaiting payment verification.
    #[serde(alias = "PENDING")]
    Pending,
    /// Credits granted.
    #[serde(alias = "APPROVED")]
    Approved,
    /// Refused.
    #[serde(alias = "REJECTED")]
    Rejected,
}

impl RechargeStatus {
    /// Query-string value for filtering.
    pub fn as_str(&self) -> &'static str {
        match self {
            RechargeStatus::Pending => "pending",
            RechargeStatus::Approved => "approved",
            RechargeStatus::Rejected => "rejected",
        }
    }
}

/// Credit purchase submitted by an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recharge {
    /// Recharge ID.
    pub id: String,
    /// Account being credited.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Amount paid, in XAF.
    pub amount: u64,
    /// SMS credits granted once approved.
    #[serde(default)]
    pub sms_credits: Option<u64>,
    /// Payment channel, e.g. "mtn_momo" or "orange_money".
    #[serde(default)]
    pub payment_method: String,
    /// Payment reference given by the customer.
    #[serde(default)]
    pub reference: Option<String>,
    /// Review state.
    pub status: RechargeStatus,
    /// Uploaded proof of payment.
    #[serde(default)]
    pub proof_url: Option<String>,
    /// Submission time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for submitting a recharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeInput {
    /// Amount paid, in XAF.
    pub amount: u64,
    /// Payment channel.
    pub payment_method: String,
    /// Payment reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Pricing plan the purchase falls under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
}

impl RechargeInput {
    /// Create a recharge input.
    pub fn new(amount: u64, payment_method: impl Into<String>) -> Self {
        Self {
            amount,
            payment_method: payment_method.into(),
            reference: None,
            plan_id: None,
        }
    }

    /// Set the payment reference.
    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set the pricing plan.
    #[must_use]
    pub fn plan(mut self, plan_id: impl Into<String>) -> Self {
        self.plan_id = Some(plan_id.into());
        self
    }

    /// Reject a zero amount or blank payment method.
    ///
    /// # Errors
    ///
    /// Fails when the amount is zero or the payment method is blank.
    pub fn validate(self) -> CoreResult<Self> {
        if self.amount == 0 {
            return Err(CoreError::validation("amount must be greater than zero"));
        }
        Ok(Self {
            payment_method: required(&self.payment_method, "paymentMethod")?,
            reference: optional(self.reference.as_deref()),
            ..self
        })
    }

    /// Text fields for a multipart submission.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("amount", self.amount.to_string()),
            ("paymentMethod", self.payment_method.clone()),
        ];
        if let Some(reference) = &self.reference {
            fields.push(("reference", reference.clone()));
        }
        if let Some(plan_id) = &self.plan_id {
            fields.push(("planId", plan_id.clone()));
        }
        fields
    }
}
