//! Route guard for the dashboard.
//!
//! Decides, for a requested path and the signed-in user, whether the page may
//! be shown or where to send the user instead.

use mboa_sms_core::{Section, User};

/// Sign-in page.
pub const LOGIN_PATH: &str = "/login";

/// Pages reachable without a session.
pub const PUBLIC_PATHS: [&str; 5] = ["/", LOGIN_PATH, "/register", "/forgot-password", "/reset-password"];

/// Pages only meaningful without a session; signed-in users are sent home.
const GUEST_ONLY_PATHS: [&str; 2] = [LOGIN_PATH, "/register"];

/// Outcome of [`resolve_route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested page.
    Allow,
    /// Navigate to another path.
    Redirect(String),
}

impl RouteDecision {
    fn redirect(path: &str) -> Self {
        Self::Redirect(path.to_string())
    }

    /// Whether the page may be shown.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decide what happens when `user` navigates to `path`.
///
/// - public pages are always shown, except that signed-in users opening the
///   login or registration page go to their home page;
/// - any other page without a user redirects to [`LOGIN_PATH`];
/// - a section the user's role may not open redirects to their home page.
pub fn resolve_route(path: &str, user: Option<&User>) -> RouteDecision {
    let path = normalize(path);

    if PUBLIC_PATHS.contains(&path) {
        return match user {
            Some(user) if GUEST_ONLY_PATHS.contains(&path) => {
                RouteDecision::redirect(user.role.home())
            }
            _ => RouteDecision::Allow,
        };
    }

    let Some(user) = user else {
        return RouteDecision::redirect(LOGIN_PATH);
    };

    match Section::from_path(path) {
        Some(section) if !user.role.can_access(section) => {
            tracing::debug!(path, role = %user.role, section = %section, "Section not allowed for role");
            RouteDecision::redirect(user.role.home())
        }
        _ => RouteDecision::Allow,
    }
}

/// Drop query, fragment and trailing slashes.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
