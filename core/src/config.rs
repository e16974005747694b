//! Connection settings for a Portal instance.

use std::fmt;

use crate::error::ConfigError;

pub const PORTAL_URL_ENV: &str = "APOLLO_PORTAL_URL";
pub const TOKEN_ENV: &str = "APOLLO_TOKEN";

/// Base URL and bearer token. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: String,
}

impl ClientConfig {
    /// Trailing `/`s on `base_url` are dropped so paths can be appended
    /// directly.
    pub fn new(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Reads `APOLLO_PORTAL_URL` and `APOLLO_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let base_url = require(PORTAL_URL_ENV)?;
        let token = require(TOKEN_ENV)?;
        Self::new(base_url.trim(), token.trim())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Only for building the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
