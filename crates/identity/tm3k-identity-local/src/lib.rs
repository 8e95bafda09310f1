//! In-process authentication collaborator with email/password accounts.
//!
//! Accounts live in memory and passwords are stored as Argon2 hashes. New
//! accounts must be confirmed through [`LocalAuthClient::confirm_email`] unless
//! the client is built with auto-confirmation, mirroring how hosted services
//! send a confirmation link before allowing sign-in.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tm3k_auth_core::{
    AuthClient, AuthError, AuthResult, Session, SessionListener, SessionListeners, SessionUser,
    SignUpOutcome, Subscription,
};
use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, info, warn};
use uuid::Uuid;

const MIN_PASSWORD_LENGTH: usize = 6;
const SESSION_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalAccount {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub confirmed: bool,
}

/// Confirmation link that has been "sent" but not followed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub token: String,
    pub email: String,
    pub redirect_to: String,
}

#[derive(Default)]
struct LocalState {
    accounts: HashMap<String, LocalAccount>,
    confirmations: HashMap<String, PendingConfirmation>,
    current: Option<Session>,
    sign_out_failure: Option<String>,
}

#[derive(Clone)]
pub struct LocalAuthClient {
    state: Arc<RwLock<LocalState>>,
    listeners: SessionListeners,
    semaphore: Arc<Semaphore>,
    auto_confirm: bool,
}

impl LocalAuthClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(LocalState::default())),
            listeners: SessionListeners::new(),
            semaphore: Arc::new(Semaphore::new(5)),
            auto_confirm: false,
        }
    }

    /// Accounts are usable immediately after sign-up, and sign-up signs in.
    pub fn with_auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    /// Adds an account directly, bypassing sign-up.
    pub async fn add_user(&self, email: &str, password: &str, confirmed: bool) -> AuthResult<()> {
        let password_hash = self.hash_password(password).await?;
        let account = LocalAccount {
            user_id: Uuid::new_v4().to_string(),
            email: normalize_email(email),
            password_hash,
            confirmed,
        };

        let mut state = self.state.write().await;
        state.accounts.insert(account.email.clone(), account);
        Ok(())
    }

    /// Follows a confirmation link.
    pub async fn confirm_email(&self, token: &str) -> AuthResult<()> {
        let mut state = self.state.write().await;
        let pending = state
            .confirmations
            .remove(token)
            .ok_or_else(|| AuthError::rejected(403, "Email link is invalid or has expired"))?;

        if let Some(account) = state.accounts.get_mut(&pending.email) {
            account.confirmed = true;
            info!("Confirmed account {}", account.user_id);
        }
        Ok(())
    }

    pub async fn pending_confirmations(&self) -> Vec<PendingConfirmation> {
        let state = self.state.read().await;
        state.confirmations.values().cloned().collect()
    }

    /// Makes the next sign-out report `message` as a failure.
    ///
    /// The local session is still cleared, as hosted services do.
    pub async fn fail_next_sign_out(&self, message: &str) {
        let mut state = self.state.write().await;
        state.sign_out_failure = Some(message.to_string());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    async fn hash_password(&self, password: &str) -> AuthResult<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| AuthError::storage(e.to_string()))?;

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::storage(e.to_string()))
    }

    async fn verify_account(&self, email: &str, password: &str) -> AuthResult<LocalAccount> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| AuthError::storage(e.to_string()))?;
        let state = self.state.read().await;

        // Real Argon2 hash of "dummy_password" so unknown emails cost the same as wrong passwords.
        const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$9QsJRKgzJkKaOUvlp7gl2Q$qmE3qIFBNJ6nZYbLYXEI2uo0zZc7T0Q8LU1ZsqsZ3QE";

        let account = state.accounts.get(email);
        let password_hash = account.map_or(DUMMY_HASH, |a| a.password_hash.as_str());

        let parsed_hash =
            PasswordHash::new(password_hash).map_err(|e| AuthError::storage(e.to_string()))?;
        let password_valid = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        match account {
            Some(account) if password_valid => Ok(account.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    fn issue_session(&self, account: &LocalAccount) -> Session {
        let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
        Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Some(Uuid::new_v4().to_string()),
            expires_at: Some(expires_at.timestamp()),
            user: SessionUser {
                id: account.user_id.clone(),
                email: Some(account.email.clone()),
            },
        }
    }

    async fn replace_session(&self, session: Option<Session>) {
        {
            let mut state = self.state.write().await;
            state.current = session.clone();
        }
        self.listeners.notify(session);
    }
}

impl Default for LocalAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthClient for LocalAuthClient {
    async fn get_current_session(&self) -> AuthResult<Option<Session>> {
        let state = self.state.read().await;
        Ok(state.current.clone())
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = normalize_email(email);
        let account = self.verify_account(&email, password).await?;

        if !account.confirmed {
            debug!("Rejected sign-in for unconfirmed account {}", account.user_id);
            return Err(AuthError::EmailNotConfirmed);
        }

        let session = self.issue_session(&account);
        info!("Signed in {}", account.user_id);
        self.replace_session(Some(session.clone())).await;
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> AuthResult<SignUpOutcome> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::rejected(400, "Missing email"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::rejected(
                422,
                format!("Password should be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        if self.state.read().await.accounts.contains_key(&email) {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = self.hash_password(password).await?;
        let account = LocalAccount {
            user_id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
            confirmed: self.auto_confirm,
        };
        let user = SessionUser {
            id: account.user_id.clone(),
            email: Some(email.clone()),
        };

        {
            let mut state = self.state.write().await;
            // Re-check under the write lock; another sign-up may have won the race.
            if state.accounts.contains_key(&email) {
                return Err(AuthError::UserAlreadyExists);
            }
            state.accounts.insert(email.clone(), account.clone());

            if !self.auto_confirm {
                let token = Uuid::new_v4().to_string();
                state.confirmations.insert(
                    token.clone(),
                    PendingConfirmation {
                        token,
                        email: email.clone(),
                        redirect_to: redirect_to.to_string(),
                    },
                );
            }
        }
        info!("Created account {}", account.user_id);

        let session = if self.auto_confirm {
            let session = self.issue_session(&account);
            self.replace_session(Some(session.clone())).await;
            Some(session)
        } else {
            None
        };

        Ok(SignUpOutcome { user, session })
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let failure = self.state.write().await.sign_out_failure.take();
        self.replace_session(None).await;

        match failure {
            Some(message) => {
                warn!("Sign-out reported failure: {}", message);
                Err(AuthError::rejected(500, message))
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    async fn setup_test_client() -> LocalAuthClient {
        let client = LocalAuthClient::new();
        client
            .add_user("test@example.com", "password123", true)
            .await
            .unwrap();
        client
            .add_user("pending@example.com", "password123", false)
            .await
            .unwrap();
        client
    }

    fn record_changes(client: &LocalAuthClient) -> (Arc<Mutex<Vec<bool>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = client.on_session_change(Arc::new(move |session: Option<Session>| {
            sink.lock().unwrap().push(session.is_some());
        }));
        (seen, sub)
    }

    #[tokio::test]
    async fn sign_in_success_broadcasts_session() {
        let client = setup_test_client().await;
        let (seen, _sub) = record_changes(&client);

        let session = client
            .sign_in_with_password("Test@Example.com ", "password123")
            .await
            .unwrap();

        assert_eq!(session.user.email.as_deref(), Some("test@example.com"));
        assert_eq!(client.get_current_session().await.unwrap(), Some(session));
        assert_eq!(*seen.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let client = setup_test_client().await;

        let wrong = client
            .sign_in_with_password("test@example.com", "nope")
            .await
            .unwrap_err();
        let unknown = client
            .sign_in_with_password("ghost@example.com", "password123")
            .await
            .unwrap_err();

        assert_eq!(wrong, AuthError::InvalidCredentials);
        assert_eq!(unknown, AuthError::InvalidCredentials);
        assert_eq!(client.get_current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unconfirmed_accounts_cannot_sign_in() {
        let client = setup_test_client().await;
        let err = client
            .sign_in_with_password("pending@example.com", "password123")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailNotConfirmed);
    }

    #[tokio::test]
    async fn sign_up_requires_confirmation() {
        let client = LocalAuthClient::new();
        let (seen, _sub) = record_changes(&client);

        let outcome = client
            .sign_up("new@example.com", "hunter22", "http://localhost:8080")
            .await
            .unwrap();
        assert!(outcome.session.is_none());
        assert!(seen.lock().unwrap().is_empty());

        let pending = client.pending_confirmations().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].email, "new@example.com");
        assert_eq!(pending[0].redirect_to, "http://localhost:8080");

        assert_eq!(
            client
                .sign_in_with_password("new@example.com", "hunter22")
                .await
                .unwrap_err(),
            AuthError::EmailNotConfirmed
        );

        client.confirm_email(&pending[0].token).await.unwrap();
        assert!(
            client
                .sign_in_with_password("new@example.com", "hunter22")
                .await
                .is_ok()
        );
        assert!(client.confirm_email(&pending[0].token).await.is_err());
    }

    #[tokio::test]
    async fn auto_confirm_sign_up_signs_in() {
        let client = LocalAuthClient::new().with_auto_confirm(true);
        let (seen, _sub) = record_changes(&client);

        let outcome = client
            .sign_up("new@example.com", "hunter22", "http://localhost:8080")
            .await
            .unwrap();

        assert!(outcome.session.is_some());
        assert!(client.pending_confirmations().await.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn duplicate_and_weak_sign_ups_are_rejected() {
        let client = setup_test_client().await;

        assert_eq!(
            client
                .sign_up("test@example.com", "password123", "http://x")
                .await
                .unwrap_err(),
            AuthError::UserAlreadyExists
        );
        assert!(matches!(
            client.sign_up("short@example.com", "abc", "http://x").await,
            Err(AuthError::Rejected { status: 422, .. })
        ));
        assert!(matches!(
            client.sign_up("   ", "password123", "http://x").await,
            Err(AuthError::Rejected { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn sign_out_clears_session_even_when_it_fails() {
        let client = setup_test_client().await;
        client
            .sign_in_with_password("test@example.com", "password123")
            .await
            .unwrap();
        let (seen, _sub) = record_changes(&client);

        client.fail_next_sign_out("service unavailable").await;
        let err = client.sign_out().await.unwrap_err();

        assert_eq!(err.message(), "service unavailable");
        assert_eq!(client.get_current_session().await.unwrap(), None);
        assert_eq!(*seen.lock().unwrap(), vec![false]);
        assert!(client.sign_out().await.is_ok());
    }

    #[tokio::test]
    async fn dropped_subscriptions_are_released() {
        let client = setup_test_client().await;
        let (seen, sub) = record_changes(&client);
        assert_eq!(client.listener_count(), 1);

        drop(sub);
        client
            .sign_in_with_password("test@example.com", "password123")
            .await
            .unwrap();

        assert_eq!(client.listener_count(), 0);
        assert!(seen.lock().unwrap().is_empty());
    }
}
