use super::{optional, required};
use crate::errors::CoreResult;
use crate::phone::{classify, Operator, PhoneNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Address book entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact ID.
    pub id: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Phone number as stored by the backend.
    pub phone: String,
    /// Optional email.
    #[serde(default)]
    pub email: Option<String>,
    /// Groups this contact belongs to.
    #[serde(default)]
    pub group_ids: Vec<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Carrier of the stored phone number.
    pub fn operator(&self) -> Operator {
        classify(&self.phone)
    }
}

/// Payload for creating or updating a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Phone number; normalised to E.164 by [`ContactInput::validate`].
    pub phone: String,
    /// Optional email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Groups to attach the contact to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<String>,
}

impl ContactInput {
    /// Create an input with a name and phone.
    pub fn new(first_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: String::new(),
            phone: phone.into(),
            email: None,
            group_ids: Vec::new(),
        }
    }

    /// Set the family name.
    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    /// Set the email.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach to a group.
    #[must_use]
    pub fn group(mut self, group_id: impl Into<String>) -> Self {
        self.group_ids.push(group_id.into());
        self
    }

    /// Trim names, normalise the phone and drop a blank email.
    ///
    /// # Errors
    ///
    /// Fails when the first name is blank or the phone is not a Cameroonian number.
    pub fn validate(self) -> CoreResult<Self> {
        let phone = PhoneNumber::parse(&self.phone)?;
        Ok(Self {
            first_name: required(&self.first_name, "firstName")?,
            last_name: self.last_name.trim().to_string(),
            phone: phone.e164(),
            email: optional(self.email.as_deref()),
            group_ids: self.group_ids,
        })
    }
}
