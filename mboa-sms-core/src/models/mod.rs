//! Resource models as exchanged with the MboaSMS REST API.
//!
//! Field names follow the backend's camelCase JSON. `*Input` types are
//! request payloads; each has a `validate` method that normalises the value
//! before it is sent.

mod contact;
mod group;
mod message;
mod pricing;
mod recharge;
mod sender_id;
mod user;

pub use contact::{Contact, ContactInput};
pub use group::{Group, GroupInput};
pub use message::{Message, MessageStatus, NewMessage};
pub use pricing::{PricingPlan, PricingPlanInput};
pub use recharge::{Recharge, RechargeInput, RechargeStatus};
pub use sender_id::{SenderId, SenderIdInput, SenderIdStatus};
pub use user::{Role, User};

use crate::errors::{CoreError, CoreResult};

/// Trim a required text field, rejecting blanks.
pub(crate) fn required(value: &str, field: &'static str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blanks to `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
