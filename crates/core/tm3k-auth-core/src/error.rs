//! Errors reported by authentication collaborators.

use thiserror::Error;

/// Errors that can occur while talking to an authentication collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email/password pair did not match an account.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The account exists but the confirmation link has not been followed yet.
    #[error("Email not confirmed")]
    EmailNotConfirmed,

    /// Sign-up was attempted for an email that already has an account.
    #[error("User already registered")]
    UserAlreadyExists,

    /// The service answered, but refused the request.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a usable answer.
    #[error("Network error: {0}")]
    Transport(String),

    /// Local session storage failed.
    #[error("Session storage error: {0}")]
    Storage(String),

    /// A body or stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    pub fn rejected<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Text shown to the user when this error is surfaced in a notification.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
