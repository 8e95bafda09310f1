//! Authentication collaborator contract.
//!
//! The application never talks to an authentication service directly. It goes
//! through [`AuthClient`], which exposes the five operations it needs: read the
//! current session, subscribe to session changes, sign in, sign up and sign out.

use async_trait::async_trait;

pub mod error;
pub mod listeners;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use listeners::{SessionListener, SessionListeners, Subscription};
pub use session::{Session, SessionUser, SignUpOutcome};

/// Client side of a hosted authentication service.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthClient: Send + Sync {
    /// Returns the session the collaborator currently holds, if any.
    async fn get_current_session(&self) -> AuthResult<Option<Session>>;

    /// Registers `listener` for every subsequent session change.
    ///
    /// Delivery stops once the returned [`Subscription`] is dropped.
    fn on_session_change(&self, listener: SessionListener) -> Subscription;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Creates an account. `redirect_to` is where the confirmation link leads.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> AuthResult<SignUpOutcome>;

    async fn sign_out(&self) -> AuthResult<()>;
}
