//! Application configuration.
//!
//! Values come from a TOML document (embedded in the web build) and, on
//! native targets, `TM3K__`-prefixed environment variables, e.g.
//! `TM3K__AUTH__BACKEND=hosted`. Environment values take precedence.

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::Level;
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthBackend {
    /// GoTrue-compatible hosted service.
    Hosted,
    /// In-process accounts, lost on reload.
    #[default]
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub backend: AuthBackend,

    /// Hosted project URL (hosted backend only)
    pub url: Option<String>,

    /// Public API key (hosted backend only)
    pub anon_key: Option<String>,

    /// Where sign-up confirmation links lead; defaults to the page origin
    pub redirect_to: Option<String>,

    /// Local backend: accounts are usable without email confirmation
    #[serde(default = "default_true")]
    pub auto_confirm: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            backend: AuthBackend::default(),
            url: None,
            anon_key: None,
            redirect_to: None,
            auto_confirm: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Loads configuration from TOML text plus environment overrides, then validates it.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let builder = ConfigBuilder::builder().add_source(File::from_str(toml, FileFormat::Toml));

        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.add_source(
            config::Environment::with_prefix("TM3K")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.backend == AuthBackend::Hosted {
            let url = self
                .auth
                .url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .context("auth.url is required for the hosted backend")?;
            let parsed = Url::parse(url).context("auth.url is not a valid URL")?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("auth.url must be an http(s) URL, got '{}'", url);
            }
            if self.auth.anon_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                anyhow::bail!("auth.anon_key is required for the hosted backend");
            }
        }

        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level> {
        self.logging.level.parse::<Level>().map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            )
        })
    }

    /// Confirmation-link target: the configured value, or the page origin.
    pub fn redirect_target(&self, origin: &str) -> String {
        self.auth
            .redirect_to
            .clone()
            .unwrap_or_else(|| origin.to_string())
    }
}
