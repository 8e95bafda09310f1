//! Email/password sign-in and sign-up form.

use crate::notify::{Notification, Notifier};
use crate::route::{Navigator, Route};
use futures_signals::signal::{Mutable, Signal};
use std::sync::Arc;
use tm3k_auth_core::AuthClient;
use tracing::{info, warn};

pub const SIGN_IN_FAILED_TITLE: &str = "Error logging in";
pub const SIGN_UP_FAILED_TITLE: &str = "Error signing up";
pub const CHECK_EMAIL_TITLE: &str = "Check your email!";
pub const CHECK_EMAIL_DESCRIPTION: &str = "We've sent you a confirmation link.";

/// Form state plus the two submit actions.
///
/// A single `busy` flag covers both actions; it is raised for the duration of
/// either call and disables both submit controls.
pub struct AuthForm {
    email: Mutable<String>,
    password: Mutable<String>,
    busy: Mutable<bool>,
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    redirect_to: String,
}

struct BusyGuard<'a>(&'a Mutable<bool>);

impl<'a> BusyGuard<'a> {
    fn raise(flag: &'a Mutable<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl AuthForm {
    /// `redirect_to` is where sign-up confirmation links lead, normally the app's own origin.
    pub fn new<S: Into<String>>(
        client: Arc<dyn AuthClient>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        redirect_to: S,
    ) -> Self {
        Self {
            email: Mutable::new(String::new()),
            password: Mutable::new(String::new()),
            busy: Mutable::new(false),
            client,
            navigator,
            notifier,
            redirect_to: redirect_to.into(),
        }
    }

    pub fn set_email<S: Into<String>>(&self, email: S) {
        self.email.set(email.into());
    }

    pub fn set_password<S: Into<String>>(&self, password: S) {
        self.password.set(password.into());
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn busy_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.busy.signal()
    }

    pub fn email_signal(&self) -> impl Signal<Item = String> + use<> {
        self.email.signal_cloned()
    }

    pub fn password_signal(&self) -> impl Signal<Item = String> + use<> {
        self.password.signal_cloned()
    }

    /// Signs in; on success goes to the main view, on failure shows the service's message.
    pub async fn sign_in(&self, email: &str, password: &str) {
        let _busy = BusyGuard::raise(&self.busy);

        match self.client.sign_in_with_password(email, password).await {
            Ok(_) => {
                info!("Sign-in succeeded");
                self.navigator.navigate(Route::Main);
            }
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                self.notifier
                    .notify(Notification::destructive(SIGN_IN_FAILED_TITLE, e.message()));
            }
        }
    }

    /// Creates an account and asks the user to confirm it by email. Never navigates.
    pub async fn sign_up(&self, email: &str, password: &str) {
        let _busy = BusyGuard::raise(&self.busy);

        match self.client.sign_up(email, password, &self.redirect_to).await {
            Ok(_) => {
                info!("Sign-up succeeded, confirmation pending");
                self.notifier.notify(Notification::info(
                    CHECK_EMAIL_TITLE,
                    CHECK_EMAIL_DESCRIPTION,
                ));
            }
            Err(e) => {
                warn!("Sign-up failed: {}", e);
                self.notifier
                    .notify(Notification::destructive(SIGN_UP_FAILED_TITLE, e.message()));
            }
        }
    }

    /// Signs in with the current field values.
    pub async fn submit_sign_in(&self) {
        let (email, password) = self.credentials();
        self.sign_in(&email, &password).await;
    }

    /// Signs up with the current field values.
    pub async fn submit_sign_up(&self) {
        let (email, password) = self.credentials();
        self.sign_up(&email, &password).await;
    }

    fn credentials(&self) -> (String, String) {
        (self.email.get_cloned(), self.password.get_cloned())
    }
}
