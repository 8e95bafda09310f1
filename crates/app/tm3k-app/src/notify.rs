//! Transient user notifications.

use futures_signals::signal_vec::{MutableVec, SignalVec};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info<T: Into<String>, D: Into<String>>(title: T, description: D) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Info,
        }
    }

    pub fn destructive<T: Into<String>, D: Into<String>>(title: T, description: D) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// A notification as shown in a list, with a handle for dismissing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotification {
    pub id: u64,
    pub notification: Notification,
}

/// Notifier that keeps every shown notification until it is dismissed.
pub struct NotificationLog {
    next_id: AtomicU64,
    shown: MutableVec<ShownNotification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            shown: MutableVec::new(),
        }
    }

    /// Records `notification` and returns the id to dismiss it with.
    pub fn push(&self, notification: Notification) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.shown
            .lock_mut()
            .push_cloned(ShownNotification { id, notification });
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.shown.lock_mut().retain(|shown| shown.id != id);
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.shown
            .lock_ref()
            .iter()
            .map(|shown| shown.notification.clone())
            .collect()
    }

    pub fn signal_vec(&self) -> impl SignalVec<Item = ShownNotification> + use<> {
        self.shown.signal_vec_cloned()
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_notifications_until_dismissed() {
        let log = NotificationLog::new();
        let first = log.push(Notification::info("Hi", "there"));
        log.notify(Notification::destructive("Oops", "broken"));

        assert_eq!(log.snapshot().len(), 2);

        log.dismiss(first);
        assert_eq!(
            log.snapshot(),
            vec![Notification::destructive("Oops", "broken")]
        );
    }
}
