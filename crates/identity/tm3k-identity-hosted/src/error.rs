//! Hosted auth error types.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tm3k_auth_core::AuthError;

pub type HostedResult<T> = Result<T, HostedError>;

#[derive(Debug, Error)]
pub enum HostedError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Session store error: {0}")]
    StoreError(#[from] AuthError),
}

/// Error body shapes used by GoTrue-compatible services.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl HostedError {
    /// Builds an API error from a non-success response.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = [
            parsed.error_description,
            parsed.msg,
            parsed.message,
            parsed.error,
        ]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

        Self::ApiError {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<HostedError> for AuthError {
    fn from(err: HostedError) -> Self {
        match err {
            HostedError::HttpError(e) => AuthError::transport(e.to_string()),
            HostedError::UrlError(e) => AuthError::transport(e.to_string()),
            HostedError::ApiError { status, message } => AuthError::rejected(status, message),
            HostedError::InvalidResponse(msg) => AuthError::Serialization(msg),
            HostedError::StoreError(e) => e,
        }
    }
}
