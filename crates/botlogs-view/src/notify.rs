use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Most toasts kept at once; older ones are dropped first
const MAX_NOTIFICATIONS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient, non-blocking message shown over the log table
#[derive(Clone, Debug)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created: Instant,
}

/// Toast queue with a fixed lifetime per message
#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn success<S: Into<String>>(&mut self, message: S) {
        self.push(NotificationKind::Success, message.into());
    }

    /// Error toast formatted as `"<title>: <detail>"`
    pub fn error(&mut self, title: &str, detail: impl std::fmt::Display) {
        self.push(NotificationKind::Error, format!("{}: {}", title, detail));
    }

    fn push(&mut self, kind: NotificationKind, message: String) {
        if self.items.len() >= MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            kind,
            message,
            created: Instant::now(),
        });
    }

    /// Drop expired toasts; returns whether anything changed
    pub fn prune(&mut self) -> bool {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items.retain(|n| n.created.elapsed() < ttl);
        before != self.items.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_prune_expired() {
        let mut notes = Notifications::new(Duration::from_secs(4));
        notes.error("Failed to load logs", "db down");
        tokio::time::advance(Duration::from_secs(3)).await;
        notes.success("Logs cleared successfully");

        assert!(!notes.prune());
        assert_eq!(notes.len(), 2);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(notes.prune());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.latest().unwrap().kind, NotificationKind::Success);
    }

    #[test]
    fn test_error_format_and_cap() {
        let mut notes = Notifications::new(Duration::from_secs(4));
        for i in 0..7 {
            notes.error("Failed to load logs", i);
        }
        assert_eq!(notes.len(), MAX_NOTIFICATIONS);
        assert_eq!(notes.iter().next().unwrap().message, "Failed to load logs: 2");
    }
}
