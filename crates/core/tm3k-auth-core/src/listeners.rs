//! Session-change listener registry and subscription handles.

use crate::Session;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::debug;

/// Callback invoked with the new session state on every change.
pub type SessionListener = Arc<dyn Fn(Option<Session>) + Send + Sync>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    listeners: BTreeMap<u64, SessionListener>,
}

/// Ordered set of session-change listeners.
///
/// Listeners are called synchronously in registration order, and each
/// notification is fully delivered before the next one starts.
#[derive(Clone, Default)]
pub struct SessionListeners {
    table: Arc<Mutex<ListenerTable>>,
}

impl SessionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: SessionListener) -> Subscription {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let id = table.next_id;
        table.next_id += 1;
        table.listeners.insert(id, listener);
        debug!("Registered session listener {}", id);

        Subscription {
            id,
            table: Arc::downgrade(&self.table),
        }
    }

    pub fn notify(&self, session: Option<Session>) {
        // Snapshot first so listeners may subscribe or unsubscribe while being called.
        let listeners: Vec<SessionListener> = {
            let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.listeners.values().cloned().collect()
        };

        debug!(
            "Delivering session change (present: {}) to {} listener(s)",
            session.is_some(),
            listeners.len()
        );

        for listener in listeners {
            listener(session.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SessionListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionListeners")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Live registration of a session listener.
///
/// Dropping the handle releases the registration.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    table: Weak<Mutex<ListenerTable>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
            if table.listeners.remove(&self.id).is_some() {
                debug!("Released session listener {}", self.id);
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
