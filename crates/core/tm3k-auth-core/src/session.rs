//! Session values handed out by authentication collaborators.

use serde::{Deserialize, Serialize};

/// The account a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
}

/// Proof of authentication.
///
/// Applications should only care whether a session is present; the fields
/// exist for collaborators that need to persist or refresh it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry as unix seconds.
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    /// Whether the session is expired at `now` (unix seconds), allowing for `leeway` seconds.
    pub fn is_expired_at(&self, now: i64, leeway: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + leeway,
            None => false,
        }
    }
}

/// Result of a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: SessionUser,
    /// Present only when the service confirms accounts immediately.
    pub session: Option<Session>,
}
