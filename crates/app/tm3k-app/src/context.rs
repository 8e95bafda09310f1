//! Session context handed from the gate to the views it guards.

use crate::route::{Navigator, Route};
use std::fmt;
use std::sync::Arc;
use tm3k_auth_core::{AuthClient, Session};
use tracing::{info, warn};

/// Proof that the view tree below the gate is rendered for a signed-in user.
///
/// Passed explicitly to child views instead of living in global state.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    pub fn new(session: Session, client: Arc<dyn AuthClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            client,
            navigator,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Signs out, then always goes to the login view.
    pub async fn log_out(&self) {
        log_out(self.client.as_ref(), self.navigator.as_ref()).await;
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

/// Sign-out failures are logged but never shown; navigation happens regardless.
pub(crate) async fn log_out(client: &dyn AuthClient, navigator: &dyn Navigator) {
    match client.sign_out().await {
        Ok(()) => info!("Signed out"),
        Err(e) => warn!("Sign-out failed, leaving anyway: {}", e),
    }
    navigator.navigate(Route::Login);
}
