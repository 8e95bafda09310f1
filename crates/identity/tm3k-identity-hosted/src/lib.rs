//! Client for a hosted, GoTrue-compatible authentication service.
//!
//! The client keeps the current session in a [`SessionStore`] and broadcasts
//! every change to registered listeners. Expired sessions are refreshed with
//! their refresh token the next time the current session is requested.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tm3k_auth_core::{
    AuthClient, AuthError, AuthResult, Session, SessionListener, SessionListeners, SignUpOutcome,
    Subscription,
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::HostedAuthConfig;
pub use error::{HostedError, HostedResult};
pub use store::{InMemorySessionStore, SessionStore};

use types::{PasswordCredentials, RefreshTokenGrant, SignUpResponse, TokenResponse};

/// Sessions expiring within this many seconds are treated as expired.
pub const EXPIRY_LEEWAY_SECS: i64 = 60;

#[derive(Clone)]
pub struct HostedAuthClient {
    http_client: Client,
    config: HostedAuthConfig,
    base_url: Url,
    store: Arc<dyn SessionStore>,
    listeners: SessionListeners,
}

impl HostedAuthClient {
    pub fn new(config: HostedAuthConfig, store: Arc<dyn SessionStore>) -> HostedResult<Self> {
        let base_url = config.base_url()?;
        Ok(Self {
            http_client: Client::new(),
            config,
            base_url,
            store,
            listeners: SessionListeners::new(),
        })
    }

    fn endpoint(&self, path: &str) -> HostedResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<B, T>(&self, url: Url, bearer: Option<&str>, body: &B) -> HostedResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http_client
            .post(url)
            .header("apikey", &self.config.anon_key)
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(HostedError::from_response(status, &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| HostedError::InvalidResponse(e.to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> HostedResult<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");

        let body: TokenResponse = self
            .post(url, None, &RefreshTokenGrant { refresh_token })
            .await?;
        Ok(body.into_session(Utc::now().timestamp()))
    }

    fn store_session(&self, session: &Session) -> HostedResult<()> {
        self.store.save(session)?;
        self.listeners.notify(Some(session.clone()));
        Ok(())
    }

    fn forget_session(&self) -> HostedResult<()> {
        self.store.clear()?;
        self.listeners.notify(None);
        Ok(())
    }

    async fn restore_session(&self) -> HostedResult<Option<Session>> {
        let Some(session) = self.store.load()? else {
            return Ok(None);
        };

        if !session.is_expired_at(Utc::now().timestamp(), EXPIRY_LEEWAY_SECS) {
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.as_deref() else {
            debug!("Stored session expired without refresh token");
            self.forget_session()?;
            return Ok(None);
        };

        match self.refresh(refresh_token).await {
            Ok(fresh) => {
                info!("Refreshed expired session");
                self.store_session(&fresh)?;
                Ok(Some(fresh))
            }
            Err(HostedError::ApiError { status, message }) => {
                warn!("Session refresh rejected ({}): {}", status, message);
                self.forget_session()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthClient for HostedAuthClient {
    async fn get_current_session(&self) -> AuthResult<Option<Session>> {
        Ok(self.restore_session().await?)
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let body: TokenResponse = self
            .post(url, None, &PasswordCredentials { email, password })
            .await?;
        let session = body.into_session(Utc::now().timestamp());

        info!("Signed in {}", session.user.id);
        self.store_session(&session)?;
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> AuthResult<SignUpOutcome> {
        let mut url = self.endpoint("auth/v1/signup")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        let body: SignUpResponse = self
            .post(url, None, &PasswordCredentials { email, password })
            .await?;

        match body {
            SignUpResponse::Session(tokens) => {
                let session = tokens.into_session(Utc::now().timestamp());
                info!("Signed up and signed in {}", session.user.id);
                self.store_session(&session)?;
                Ok(SignUpOutcome {
                    user: session.user.clone(),
                    session: Some(session),
                })
            }
            SignUpResponse::User(user) => {
                info!("Signed up {}, awaiting email confirmation", user.id);
                Ok(SignUpOutcome {
                    user: user.into(),
                    session: None,
                })
            }
        }
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let Some(session) = self.store.load()? else {
            self.listeners.notify(None);
            return Ok(());
        };

        let url = self.endpoint("auth/v1/logout")?;
        let result = self
            .http_client
            .post(url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;

        // The local session goes away whatever the service says.
        self.forget_session()?;

        let response = result.map_err(HostedError::from)?;
        let status = response.status();
        if status.is_success() {
            info!("Signed out {}", session.user.id);
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            let err = HostedError::from_response(status, &error_text);
            warn!("Sign-out failed: {}", err);
            Err(AuthError::from(err))
        }
    }
}
