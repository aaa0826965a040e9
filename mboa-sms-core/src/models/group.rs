use super::{optional, required};
use crate::errors::CoreResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named set of contacts used as a broadcast target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group ID.
    pub id: String,
    /// Group name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Number of member contacts.
    #[serde(default)]
    pub contact_count: u64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInput {
    /// Group name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GroupInput {
    /// Create a group input.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trim fields and reject a blank name.
    ///
    /// # Errors
    ///
    /// Fails when the name is blank.
    pub fn validate(self) -> CoreResult<Self> {
        Ok(Self {
            name: required(&self.name, "name")?,
            description: optional(self.description.as_deref()),
        })
    }
}
