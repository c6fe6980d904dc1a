//! Client configuration: who we are and where to connect.

use serde::{Deserialize, Serialize};

/// Game server host; the variant is appended as the path.
pub const DEFAULT_HOST: &str = "wss://games.jdis.ca";

/// Variant used when none is configured.
pub const DEFAULT_VARIANT: &str = "ws";

/// Environment variable holding the team token.
pub const TOKEN_ENV: &str = "FIREWALL_TOKEN";

/// Environment variable selecting the server variant.
pub const VARIANT_ENV: &str = "FIREWALL_WS";

/// Errors raised while assembling a [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No team token was provided.
    #[error("missing team token (set {TOKEN_ENV})")]
    MissingToken,
}

/// Connection settings for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Team token sent in `link` and `confirm`.
    pub token: String,
    /// Server variant, the last path segment of the endpoint.
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Full endpoint URL, overriding the one derived from `variant`.
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_variant() -> String {
    DEFAULT_VARIANT.to_string()
}

impl ClientConfig {
    /// A config with a hardcoded token and the default variant.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            variant: default_variant(),
            endpoint: None,
        }
    }

    /// Reads [`TOKEN_ENV`] (required) and [`VARIANT_ENV`] (optional).
    ///
    /// # Errors
    /// [`ConfigError::MissingToken`] if the token is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN_ENV)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let mut config = Self::new(token);
        if let Some(variant) = lookup(VARIANT_ENV).filter(|v| !v.trim().is_empty()) {
            config.variant = variant.trim().to_string();
        }
        Ok(config)
    }

    /// Sets the server variant.
    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Connects to `url` instead of the derived endpoint.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// The URL the client dials.
    pub fn url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.clone(),
            None => format!("{DEFAULT_HOST}/{}", self.variant),
        }
    }

    /// Checks the config is usable.
    ///
    /// # Errors
    /// [`ConfigError::MissingToken`] if the token is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(())
    }
}
