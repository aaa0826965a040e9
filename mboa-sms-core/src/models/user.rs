use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator: approves sender IDs and recharges, manages plans.
    #[serde(alias = "ADMIN")]
    Admin,
    /// Customer account sending SMS.
    #[serde(alias = "CLIENT", alias = "user", alias = "USER")]
    Client,
}

impl Role {
    /// Whether this role has administrator rights.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Client => f.write_str("client"),
        }
    }
}

/// Authenticated account profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Access role.
    pub role: Role,
    /// Remaining SMS credits.
    #[serde(default)]
    pub sms_balance: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases() {
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::Client);
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"a@mboa.cm","role":"admin"}"#,
        )
        .unwrap();
        assert!(user.role.is_admin());
        assert_eq!(user.sms_balance, 0);
        assert!(user.phone.is_none());
    }
}
