//! Session gate guarding the task editor view.
//!
//! The gate starts in [`GateState::Loading`], asks the collaborator for the
//! current session once and listens for session changes until it is
//! deactivated or dropped. Every answer sets the state directly; the gate never
//! goes back to `Loading`.

use crate::context::{self, SessionContext};
use crate::route::{Navigator, Route};
use futures_signals::signal::{Mutable, Signal, SignalExt};
use std::sync::{Arc, Mutex, PoisonError};
use tm3k_auth_core::{AuthClient, Session, Subscription};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum GateState {
    Loading,
    Authenticated(SessionContext),
    Unauthenticated,
}

impl GateState {
    pub fn status(&self) -> GateStatus {
        match self {
            GateState::Loading => GateStatus::Loading,
            GateState::Authenticated(_) => GateStatus::Authenticated,
            GateState::Unauthenticated => GateStatus::Unauthenticated,
        }
    }
}

/// [`GateState`] without the context, for cheap comparisons and rendering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

pub struct SessionGate {
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    state: Mutable<GateState>,
    subscription: Mutex<Option<Subscription>>,
}

impl SessionGate {
    pub fn new(client: Arc<dyn AuthClient>, navigator: Arc<dyn Navigator>) -> Arc<Self> {
        Arc::new(Self {
            client,
            navigator,
            state: Mutable::new(GateState::Loading),
            subscription: Mutex::new(None),
        })
    }

    /// Subscribes to session changes and resolves the current session.
    pub async fn activate(self: &Arc<Self>) {
        let gate = Arc::downgrade(self);
        let subscription = self
            .client
            .on_session_change(Arc::new(move |session: Option<Session>| {
                if let Some(gate) = gate.upgrade() {
                    gate.observe(session);
                }
            }));
        *self.lock_subscription() = Some(subscription);
        debug!("Session gate activated");

        let session = match self.client.get_current_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not read current session: {}", e);
                None
            }
        };

        if self.is_active() {
            self.observe(session);
        }
    }

    /// Releases the session-change registration.
    pub fn deactivate(&self) {
        if self.lock_subscription().take().is_some() {
            debug!("Session gate deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock_subscription().is_some()
    }

    pub fn state(&self) -> GateState {
        self.state.get_cloned()
    }

    pub fn status(&self) -> GateStatus {
        self.state.lock_ref().status()
    }

    pub fn state_signal(&self) -> impl Signal<Item = GateState> + use<> {
        self.state.signal_cloned()
    }

    pub fn status_signal(&self) -> impl Signal<Item = GateStatus> + use<> {
        self.state.signal_ref(GateState::status).dedupe()
    }

    /// Context for the guarded view, once a session is known.
    pub fn context(&self) -> Option<SessionContext> {
        match &*self.state.lock_ref() {
            GateState::Authenticated(context) => Some(context.clone()),
            _ => None,
        }
    }

    /// Signs out and goes to the login view, whether or not sign-out succeeded.
    pub async fn log_out(&self) {
        context::log_out(self.client.as_ref(), self.navigator.as_ref()).await;
    }

    fn observe(&self, session: Option<Session>) {
        let next = match session {
            Some(session) => GateState::Authenticated(SessionContext::new(
                session,
                Arc::clone(&self.client),
                Arc::clone(&self.navigator),
            )),
            None => GateState::Unauthenticated,
        };

        let previous = self.state.replace(next);
        let now = self.status();
        debug!("Session gate: {:?} -> {:?}", previous.status(), now);

        if now == GateStatus::Unauthenticated && previous.status() != GateStatus::Unauthenticated {
            info!("No session, redirecting to {}", Route::Login);
            self.navigator.navigate(Route::Login);
        }
    }

    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
