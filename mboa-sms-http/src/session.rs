//! Session-expired notification.

use tokio::sync::broadcast;

/// Called once per failed refresh episode, after the tokens were cleared.
///
/// Implementations typically send the user back to the login screen.
pub trait SessionExpiredHandler: Send + Sync {
    /// The session can no longer be renewed.
    fn on_session_expired(&self);
}

impl<F> SessionExpiredHandler for F
where
    F: Fn() + Send + Sync,
{
    fn on_session_expired(&self) {
        self()
    }
}

/// Handler that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSessionExpired;

impl SessionExpiredHandler for LogSessionExpired {
    fn on_session_expired(&self) {
        tracing::warn!("Session expired; re-authentication required");
    }
}

/// Session lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The refresh token was missing or rejected.
    Expired,
}

/// Handler that broadcasts [`SessionEvent::Expired`] to every subscriber.
#[derive(Debug, Clone)]
pub struct SessionNotifier {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionNotifier {
    /// Create a notifier buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for SessionNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl SessionExpiredHandler for SessionNotifier {
    fn on_session_expired(&self) {
        tracing::warn!(
            subscribers = self.tx.receiver_count(),
            "Session expired; notifying subscribers"
        );
        // No subscribers is fine.
        let _ = self.tx.send(SessionEvent::Expired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_handler() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = count.clone();
        let handler = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        handler.on_session_expired();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_notifier_broadcasts() {
        let notifier = SessionNotifier::default();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.on_session_expired();

        assert_eq!(a.recv().await.unwrap(), SessionEvent::Expired);
        assert_eq!(b.recv().await.unwrap(), SessionEvent::Expired);
    }

    #[test]
    fn test_notifier_without_subscribers() {
        SessionNotifier::new(0).on_session_expired();
    }
}
