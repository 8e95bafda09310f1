#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tm3k_app::{Navigator, Route};
use tm3k_auth_core::{
    AuthClient, AuthError, AuthResult, Session, SessionListener, SessionListeners, SessionUser,
    SignUpOutcome, Subscription,
};
use tokio::sync::oneshot;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tm3k_app=debug")
        .with_test_writer()
        .try_init();
}

pub fn session(user_id: &str) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        refresh_token: None,
        expires_at: None,
        user: SessionUser {
            id: user_id.to_string(),
            email: None,
        },
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// Collaborator whose answers are chosen by the test.
pub struct ScriptedClient {
    pending_initial: Mutex<Option<oneshot::Receiver<Option<Session>>>>,
    current: Mutex<Option<Session>>,
    sign_in_result: Mutex<Option<AuthResult<Session>>>,
    sign_in_hold: Mutex<Option<oneshot::Receiver<()>>>,
    sign_up_result: Mutex<Option<AuthResult<SignUpOutcome>>>,
    sign_out_result: Mutex<Option<AuthResult<()>>>,
    pub listeners: SessionListeners,
    pub sign_out_calls: AtomicUsize,
    pub redirect_targets: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(current: Option<Session>) -> Arc<Self> {
        Arc::new(Self {
            pending_initial: Mutex::new(None),
            current: Mutex::new(current),
            sign_in_result: Mutex::new(None),
            sign_in_hold: Mutex::new(None),
            sign_up_result: Mutex::new(None),
            sign_out_result: Mutex::new(None),
            listeners: SessionListeners::new(),
            sign_out_calls: AtomicUsize::new(0),
            redirect_targets: Mutex::new(Vec::new()),
        })
    }

    /// The first `get_current_session` call waits until the sender fires.
    pub fn pending() -> (Arc<Self>, oneshot::Sender<Option<Session>>) {
        let (tx, rx) = oneshot::channel();
        let client = Self::new(None);
        *client.pending_initial.lock().unwrap() = Some(rx);
        (client, tx)
    }

    pub fn answer_sign_in(&self, result: AuthResult<Session>) {
        *self.sign_in_result.lock().unwrap() = Some(result);
    }

    /// The next sign-in does not answer until the returned sender fires.
    pub fn hold_sign_in(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.sign_in_hold.lock().unwrap() = Some(rx);
        tx
    }

    pub fn answer_sign_up(&self, result: AuthResult<SignUpOutcome>) {
        *self.sign_up_result.lock().unwrap() = Some(result);
    }

    pub fn answer_sign_out(&self, result: AuthResult<()>) {
        *self.sign_out_result.lock().unwrap() = Some(result);
    }

    pub fn emit(&self, session: Option<Session>) {
        *self.current.lock().unwrap() = session.clone();
        self.listeners.notify(session);
    }
}

#[async_trait]
impl AuthClient for ScriptedClient {
    async fn get_current_session(&self) -> AuthResult<Option<Session>> {
        let pending = self.pending_initial.lock().unwrap().take();
        match pending {
            Some(rx) => Ok(rx.await.unwrap_or(None)),
            None => Ok(self.current.lock().unwrap().clone()),
        }
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> AuthResult<Session> {
        let hold = self.sign_in_hold.lock().unwrap().take();
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        self.sign_in_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(AuthError::InvalidCredentials))
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        redirect_to: &str,
    ) -> AuthResult<SignUpOutcome> {
        self.redirect_targets
            .lock()
            .unwrap()
            .push(redirect_to.to_string());
        self.sign_up_result.lock().unwrap().take().unwrap_or_else(|| {
            Ok(SignUpOutcome {
                user: SessionUser {
                    id: "new-user".to_string(),
                    email: Some(email.to_string()),
                },
                session: None,
            })
        })
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_out_result.lock().unwrap().take().unwrap_or(Ok(()))
    }
}
