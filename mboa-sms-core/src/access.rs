//! Dashboard sections and which roles may open them.

use crate::models::Role;
use std::fmt;

/// A dashboard area mounted under its own path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Landing page with balances and recent activity.
    Overview,
    /// Address book.
    Contacts,
    /// Contact groups.
    Groups,
    /// Message history and composer.
    Messages,
    /// Sender ID requests and approvals.
    SenderIds,
    /// Credit purchases and approvals.
    Recharges,
    /// Pricing plan management.
    PricingPlans,
    /// Account administration.
    Users,
    /// Profile and password.
    Settings,
}

impl Section {
    /// Every section.
    pub const ALL: [Section; 9] = [
        Section::Overview,
        Section::Contacts,
        Section::Groups,
        Section::Messages,
        Section::SenderIds,
        Section::Recharges,
        Section::PricingPlans,
        Section::Users,
        Section::Settings,
    ];

    /// Path the section is mounted at.
    pub fn path(&self) -> &'static str {
        match self {
            Section::Overview => "/dashboard",
            Section::Contacts => "/contacts",
            Section::Groups => "/groups",
            Section::Messages => "/messages",
            Section::SenderIds => "/sender-ids",
            Section::Recharges => "/recharges",
            Section::PricingPlans => "/pricing-plans",
            Section::Users => "/users",
            Section::Settings => "/settings",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Contacts => "Contacts",
            Section::Groups => "Groups",
            Section::Messages => "Messages",
            Section::SenderIds => "Sender IDs",
            Section::Recharges => "Recharges",
            Section::PricingPlans => "Pricing plans",
            Section::Users => "Users",
            Section::Settings => "Settings",
        }
    }

    /// The section owning `path`, matched on whole segments.
    ///
    /// `/contacts/42` belongs to [`Section::Contacts`]; `/contactsx` does not.
    pub fn from_path(path: &str) -> Option<Section> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        Section::ALL.into_iter().find(|section| {
            path.strip_prefix(section.path())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Role {
    /// Whether this role may open `section`.
    ///
    /// Administrators manage plans and accounts but have no address book;
    /// clients have the address book but no administration pages.
    pub fn can_access(&self, section: Section) -> bool {
        match section {
            Section::PricingPlans | Section::Users => self.is_admin(),
            Section::Contacts | Section::Groups => !self.is_admin(),
            Section::Overview
            | Section::Messages
            | Section::SenderIds
            | Section::Recharges
            | Section::Settings => true,
        }
    }

    /// Sections shown in this role's menu, in menu order.
    pub fn sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.can_access(*s))
            .collect()
    }

    /// Where this role lands after signing in.
    pub fn home(&self) -> &'static str {
        Section::Overview.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/contacts", Some(Section::Contacts))]
    #[case("/contacts/42/edit", Some(Section::Contacts))]
    #[case("/sender-ids?status=pending", Some(Section::SenderIds))]
    #[case("/dashboard", Some(Section::Overview))]
    #[case("/contactsx", None)]
    #[case("/login", None)]
    #[case("/", None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Option<Section>) {
        assert_eq!(Section::from_path(path), expected);
    }

    #[rstest]
    #[case(Role::Admin, Section::PricingPlans, true)]
    #[case(Role::Admin, Section::Users, true)]
    #[case(Role::Admin, Section::Contacts, false)]
    #[case(Role::Client, Section::Contacts, true)]
    #[case(Role::Client, Section::Groups, true)]
    #[case(Role::Client, Section::PricingPlans, false)]
    #[case(Role::Client, Section::Users, false)]
    #[case(Role::Client, Section::Recharges, true)]
    fn test_can_access(#[case] role: Role, #[case] section: Section, #[case] allowed: bool) {
        assert_eq!(role.can_access(section), allowed);
    }

    #[test]
    fn test_menus() {
        assert_eq!(
            Role::Client.sections(),
            vec![
                Section::Overview,
                Section::Contacts,
                Section::Groups,
                Section::Messages,
                Section::SenderIds,
                Section::Recharges,
                Section::Settings,
            ]
        );
        assert!(Role::Admin.sections().contains(&Section::Users));
        assert_eq!(Role::Admin.home(), "/dashboard");
    }
}
