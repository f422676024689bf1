use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CoreError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "FINANCE_API_BASE_URL";
pub const ENV_TOKEN: &str = "FINANCE_API_TOKEN";
pub const ENV_TIMEOUT: &str = "FINANCE_API_TIMEOUT_SECS";
pub const ENV_COLOR_STORE: &str = "FINANCE_COLOR_STORE";

/// Connection and local-storage settings for the client.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api`. Endpoint paths are appended to it.
    pub base_url: String,

    /// Bearer token obtained elsewhere; attached to every request when set.
    pub access_token: Option<String>,

    /// Per-request timeout (native targets only).
    pub timeout_secs: u64,

    /// JSON file backing the color palette store. In-memory when `None`.
    pub color_store_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            color_store_path: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("color_store_path", &self.color_store_path)
            .finish()
    }
}

impl ClientConfig {
    /// Build from process environment variables, defaulting anything unset.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (used by `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = non_empty(ENV_BASE_URL) {
            config.base_url = url;
        }
        config.access_token = non_empty(ENV_TOKEN);
        if let Some(raw) = non_empty(ENV_TIMEOUT) {
            config.timeout_secs = raw.parse().map_err(|_| {
                CoreError::InvalidConfig(format!("{ENV_TIMEOUT} must be a whole number of seconds, got '{raw}'"))
            })?;
        }
        config.color_store_path = non_empty(ENV_COLOR_STORE).map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidConfig(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(CoreError::InvalidConfig("base_url must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::InvalidConfig("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
