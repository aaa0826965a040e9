//! # mboa-sms-core
//!
//! Core types shared by the MboaSMS dashboard crates.
//!
//! This crate has no I/O. It provides:
//!
//! - **Models**: contacts, groups, sender IDs, pricing plans, recharges,
//!   messages and users as the backend serialises them
//! - **Pagination**: [`Page`] and [`PageQuery`] for list endpoints
//! - **Phone numbers**: [`PhoneNumber`] parsing and [`Operator`] classification
//!   for Cameroonian carriers
//! - **SMS segments**: [`SmsSegments`] encoding and part counting
//! - **Access**: dashboard [`Section`]s and [`Role::can_access`]
//! - **Errors**: [`CoreError`] for validation failures
//!
//! ## Example
//!
//! ```rust
//! use mboa_sms_core::{Operator, PhoneNumber, SmsSegments};
//!
//! let phone = PhoneNumber::parse("+237 677 12 34 56").unwrap();
//! assert_eq!(phone.operator(), Operator::Mtn);
//! assert_eq!(phone.e164(), "+237677123456");
//!
//! let segments = SmsSegments::measure("Bonjour!");
//! assert_eq!(segments.parts, 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod access;
pub mod errors;
pub mod models;
pub mod pagination;
pub mod phone;
pub mod sms;

pub use access::Section;
pub use errors::{CoreError, CoreResult};
pub use models::{
    Contact, ContactInput, Group, GroupInput, Message, MessageStatus, NewMessage, PricingPlan,
    PricingPlanInput, Recharge, RechargeInput, RechargeStatus, Role, SenderId, SenderIdInput,
    SenderIdStatus, User,
};
pub use pagination::{Page, PageQuery};
pub use phone::{classify, normalize, Operator, PhoneNumber};
pub use sms::{SmsEncoding, SmsSegments};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        classify, CoreError, CoreResult, Operator, Page, PageQuery, PhoneNumber, Role, Section,
        SmsSegments,
    };
}
