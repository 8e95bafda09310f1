//! Session persistence in `window.localStorage`, so a hosted session survives reloads.

use tm3k_auth_core::{AuthError, AuthResult, Session};
use tm3k_identity_hosted::SessionStore;
use tracing::warn;
use web_sys::Storage;

pub const DEFAULT_KEY: &str = "tm3k.auth.session";

#[derive(Debug, Clone)]
pub struct LocalStorageSessionStore {
    key: String,
}

impl LocalStorageSessionStore {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn storage() -> AuthResult<Storage> {
        gloo_utils::window()
            .local_storage()
            .map_err(|e| AuthError::storage(format!("localStorage is not accessible: {e:?}")))?
            .ok_or_else(|| AuthError::storage("localStorage is not available"))
    }
}

impl Default for LocalStorageSessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEY)
    }
}

impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> AuthResult<Option<Session>> {
        let storage = Self::storage()?;
        let Some(raw) = storage
            .get_item(&self.key)
            .map_err(|e| AuthError::storage(format!("{e:?}")))?
        else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // Unreadable entries are dropped so the user lands on the login view.
                warn!(key = %self.key, "Discarding unreadable stored session: {}", e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        Self::storage()?
            .set_item(&self.key, &raw)
            .map_err(|e| AuthError::storage(format!("{e:?}")))
    }

    fn clear(&self) -> AuthResult<()> {
        Self::storage()?
            .remove_item(&self.key)
            .map_err(|e| AuthError::storage(format!("{e:?}")))
    }
}
