//! Transient, auto-dismissing user notifications.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use studyhub_core::config::NotificationConfig;
use studyhub_core::types::NotificationId;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct Inner {
    queue: VecDeque<Notification>,
    pushed: usize,
    errors: usize,
}

/// Queue of notifications that expire after a fixed time to live.
#[derive(Debug)]
pub struct NotificationCenter {
    ttl: Duration,
    max_visible: usize,
    inner: Mutex<Inner>,
}

impl NotificationCenter {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            ttl: Duration::seconds(config.ttl_seconds as i64),
            max_visible: config.max_visible.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> Notification {
        self.push_at(level, message, Utc::now())
    }

    pub fn info(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationLevel::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationLevel::Error, message)
    }

    fn push_at(
        &self,
        level: NotificationLevel,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            level,
            message: message.into(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        debug!(level = %level, message = %notification.message, "Notification pushed");

        let mut inner = self.inner.lock();
        inner.queue.retain(|n| !n.is_expired_at(now));
        inner.queue.push_back(notification.clone());
        inner.pushed += 1;
        if level == NotificationLevel::Error {
            inner.errors += 1;
        }
        notification
    }

    /// Unexpired notifications, oldest first, at most `max_visible`.
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Utc::now())
    }

    /// [`active`](Self::active) evaluated at an explicit instant.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let inner = self.inner.lock();
        let live: Vec<&Notification> = inner
            .queue
            .iter()
            .filter(|n| !n.is_expired_at(now))
            .collect();
        let skip = live.len().saturating_sub(self.max_visible);
        live.into_iter().skip(skip).cloned().collect()
    }

    /// Dismiss a notification early. Returns `false` if it is not queued.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.queue.len();
        inner.queue.retain(|n| n.id != id);
        inner.queue.len() != before
    }

    /// Total notifications pushed since creation.
    pub fn history_len(&self) -> usize {
        self.inner.lock().pushed
    }

    /// Total error notifications pushed since creation.
    pub fn error_count(&self) -> usize {
        self.inner.lock().errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(ttl_seconds: u64, max_visible: usize) -> NotificationCenter {
        NotificationCenter::new(&NotificationConfig {
            ttl_seconds,
            max_visible,
        })
    }

    #[test]
    fn test_expiry() {
        let center = center(4, 5);
        let now = Utc::now();
        center.push_at(NotificationLevel::Success, "Folder created", now);

        assert_eq!(center.active_at(now + Duration::seconds(3)).len(), 1);
        assert!(center.active_at(now + Duration::seconds(4)).is_empty());
        assert_eq!(center.history_len(), 1);
    }

    #[test]
    fn test_cap_keeps_newest() {
        let center = center(60, 2);
        for i in 0..4 {
            center.info(format!("n{i}"));
        }
        let active: Vec<String> = center.active().into_iter().map(|n| n.message).collect();
        assert_eq!(active, vec!["n2", "n3"]);
    }

    #[test]
    fn test_dismiss_and_error_count() {
        let center = center(60, 5);
        let n = center.error("Unsupported content type");
        center.success("Saved");
        assert_eq!(center.error_count(), 1);

        assert!(center.dismiss(n.id));
        assert!(!center.dismiss(n.id));
        assert_eq!(center.active().len(), 1);
    }
}
