//! Single-flight refresh state.
//!
//! [`RefreshState`] lives behind a mutex in the client and is never held
//! across an await. Every 401 is admitted under that lock, so checking the
//! flag and joining the queue happen as one step.

use crate::error::ClientResult;
use crate::request::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::oneshot;

/// A request parked behind a refresh, with the channel its caller awaits.
pub(crate) struct PendingRequest {
    pub(crate) request: HttpRequest,
    pub(crate) reply: oneshot::Sender<ClientResult<HttpResponse>>,
}

/// What a request that received a 401 should do next.
pub(crate) enum Admission {
    /// Queued and this request started the refresh.
    Lead,
    /// Queued behind a refresh already in flight.
    Wait,
    /// The token it was sent with has since been replaced; retry once now.
    RetryNow(PendingRequest),
    /// Nothing to refresh with.
    NoRefreshToken,
    /// The token it was sent with belongs to a session already expired.
    AlreadyExpired,
}

/// Refresh flag plus the FIFO of parked requests.
///
/// Also remembers the access token of the session that last expired, so a
/// late 401 for that session does not report the expiry again.
#[derive(Default)]
pub(crate) struct RefreshState {
    in_progress: bool,
    queue: VecDeque<PendingRequest>,
    episode_token: Option<String>,
    expired_token: Option<String>,
}

impl RefreshState {
    /// Decide the fate of a 401.
    ///
    /// `sent_token` is the access token the request carried, `current` the
    /// token stored now and `has_refresh_token` whether a refresh is possible.
    pub(crate) fn admit(
        &mut self,
        pending: PendingRequest,
        sent_token: Option<&str>,
        current: Option<&str>,
        has_refresh_token: bool,
    ) -> Admission {
        if self.in_progress {
            self.queue.push_back(pending);
            return Admission::Wait;
        }
        if current.is_some() && current != sent_token {
            return Admission::RetryNow(pending);
        }
        if sent_token.is_some() && sent_token == self.expired_token.as_deref() {
            return Admission::AlreadyExpired;
        }
        if !has_refresh_token {
            self.expired_token = sent_token.map(str::to_owned);
            return Admission::NoRefreshToken;
        }
        self.in_progress = true;
        self.episode_token = sent_token.map(str::to_owned);
        self.queue.push_back(pending);
        Admission::Lead
    }

    /// End the episode: clear the flag and hand back the queue in order.
    ///
    /// When the refresh failed, the token the episode started from is marked
    /// expired.
    pub(crate) fn finish(&mut self, refreshed: bool) -> VecDeque<PendingRequest> {
        self.in_progress = false;
        let token = self.episode_token.take();
        self.expired_token = if refreshed { None } else { token };
        std::mem::take(&mut self.queue)
    }

    pub(crate) fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub(crate) fn queued(&self) -> usize {
        self.queue.len()
    }
}

/// Body of the refresh call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub(crate) refresh_token: &'a str,
}

/// Successful refresh response. A missing `refreshToken` keeps the old one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshResponse {
    #[serde(alias = "accessToken")]
    pub(crate) token: String,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn pending(path: &str) -> (PendingRequest, oneshot::Receiver<ClientResult<HttpResponse>>) {
        let (reply, rx) = oneshot::channel();
        (
            PendingRequest {
                request: HttpRequest::new(Method::GET, path),
                reply,
            },
            rx,
        )
    }

    #[test]
    fn test_first_401_leads_then_others_wait() {
        let mut state = RefreshState::default();

        let (a, _ra) = pending("/a");
        let admission = state.admit(a, Some("A1"), Some("A1"), true);
        assert!(matches!(admission, Admission::Lead));
        assert!(state.in_progress());

        let (b, _rb) = pending("/b");
        let admission = state.admit(b, Some("A1"), Some("A1"), true);
        assert!(matches!(admission, Admission::Wait));
        assert_eq!(state.queued(), 2);

        let drained: Vec<_> = state.finish(true).into_iter().map(|p| p.request.path).collect();
        assert_eq!(drained, vec!["/a", "/b"]);
        assert!(!state.in_progress());
        assert_eq!(state.queued(), 0);
    }

    #[test]
    fn test_missing_refresh_token() {
        let mut state = RefreshState::default();
        let (a, _ra) = pending("/a");
        let admission = state.admit(a, Some("A1"), Some("A1"), false);
        assert!(matches!(admission, Admission::NoRefreshToken));
        assert!(!state.in_progress());
        assert_eq!(state.queued(), 0);
    }

    #[test]
    fn test_stale_token_retries_without_refresh() {
        let mut state = RefreshState::default();
        let (a, _ra) = pending("/a");
        let admission = state.admit(a, Some("A1"), Some("A2"), true);
        assert!(matches!(admission, Admission::RetryNow(p) if p.request.path == "/a"));
        assert!(!state.in_progress());
    }

    #[test]
    fn test_late_401_after_failed_episode_is_already_expired() {
        let mut state = RefreshState::default();
        let (a, _ra) = pending("/a");
        assert!(matches!(state.admit(a, Some("A1"), Some("A1"), true), Admission::Lead));
        assert_eq!(state.finish(false).len(), 1);

        // Tokens were cleared by the failed episode.
        let (late, _rl) = pending("/slow");
        let admission = state.admit(late, Some("A1"), None, false);
        assert!(matches!(admission, Admission::AlreadyExpired));

        // A request that never carried a token still reports the expiry.
        let (anon, _rn) = pending("/anon");
        assert!(matches!(state.admit(anon, None, None, false), Admission::NoRefreshToken));
    }

    #[test]
    fn test_successful_episode_forgets_expired_token() {
        let mut state = RefreshState::default();
        let (a, _ra) = pending("/a");
        state.admit(a, Some("A1"), Some("A1"), false);

        let (b, _rb) = pending("/b");
        assert!(matches!(state.admit(b, Some("A5"), Some("A5"), true), Admission::Lead));
        state.finish(true);

        let (c, _rc) = pending("/c");
        assert!(matches!(state.admit(c, Some("A1"), Some("A1"), true), Admission::Lead));
    }

    #[test]
    fn test_refresh_response_shapes() {
        let full: RefreshResponse =
            serde_json::from_str(r#"{"token":"A2","refreshToken":"R2"}"#).unwrap();
        assert_eq!(full.token, "A2");
        assert_eq!(full.refresh_token.as_deref(), Some("R2"));

        let access_only: RefreshResponse = serde_json::from_str(r#"{"accessToken":"A3"}"#).unwrap();
        assert_eq!(access_only.token, "A3");
        assert!(access_only.refresh_token.is_none());

        let body = serde_json::to_value(RefreshRequest { refresh_token: "R1" }).unwrap();
        assert_eq!(body, serde_json::json!({"refreshToken": "R1"}));
    }
}
