//! Hosted auth configuration.

use crate::error::HostedResult;
use serde::{Deserialize, Serialize};
use url::Url;

/// Location and public key of a hosted auth project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedAuthConfig {
    /// Project base URL, e.g. `https://abc.example.co`.
    pub url: String,
    /// Public (anonymous) API key sent with every request.
    pub anon_key: String,
}

impl HostedAuthConfig {
    pub fn new<U: Into<String>, K: Into<String>>(url: U, anon_key: K) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Base URL with a trailing slash so relative joins keep any path prefix.
    pub(crate) fn base_url(&self) -> HostedResult<Url> {
        let mut raw = self.url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }
}
