//! Persistence for the session the hosted client holds.

use std::sync::{Mutex, PoisonError};
use tm3k_auth_core::{AuthResult, Session};

/// Where the client keeps its session between calls (and, in browsers, reloads).
pub trait SessionStore: Send + Sync {
    fn load(&self) -> AuthResult<Option<Session>>;

    fn save(&self, session: &Session) -> AuthResult<()>;

    fn clear(&self) -> AuthResult<()>;
}

/// Session store that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> AuthResult<Option<Session>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> AuthResult<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}
