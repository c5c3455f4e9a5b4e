//! Client configuration loading from files and the environment.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transport::{DEFAULT_API_BASE, DEFAULT_UPLOAD_BASE};
use crate::types::RequestOptions;

pub const API_KEY_VAR: &str = "STRIPE_API_KEY";
pub const API_BASE_VAR: &str = "STRIPE_API_BASE";
pub const API_VERSION_VAR: &str = "STRIPE_API_VERSION";
pub const ACCOUNT_VAR: &str = "STRIPE_ACCOUNT";

/// Default request timeout (80 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 80;

/// Credentials and endpoints used to build a transport and request options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_upload_base")]
    pub upload_base: String,
    #[serde(default)]
    pub api_version: Option<String>,
    /// Connected account used for every call unless overridden.
    #[serde(default)]
    pub connect_account: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_upload_base() -> String {
    DEFAULT_UPLOAD_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Configuration with defaults for everything except the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: default_api_base(),
            upload_base: default_upload_base(),
            api_version: None,
            connect_account: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if the file doesn't exist,
    /// `ConfigError::InvalidJson` if it isn't a valid config, or
    /// `ConfigError::MissingApiKey` if the key is empty.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::InvalidJson { source })?;
        config.checked()
    }

    /// Build configuration from `STRIPE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();
        let mut config = Self::new(api_key);
        if let Some(base) = lookup(API_BASE_VAR) {
            config.api_base = base;
        }
        config.api_version = lookup(API_VERSION_VAR);
        config.connect_account = lookup(ACCOUNT_VAR);
        config.checked()
    }

    /// Per-call options derived from this configuration.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            api_key: self.api_key.clone(),
            connect_account: self.connect_account.clone(),
            api_version: self.api_version.clone(),
            idempotency_key: None,
        }
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey { var: API_KEY_VAR });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_applies_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"api_key": "sk_test_123"}}"#).unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config, ClientConfig::new("sk_test_123"));
        assert_eq!(config.timeout_secs, 80);
        assert_eq!(config.api_base, "https://api.stripe.com/v1");
    }

    #[test]
    fn load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "api_key": "sk_test_123",
                "api_base": "http://localhost:12111/v1",
                "api_version": "2020-08-27",
                "connect_account": "acct_1",
                "timeout_secs": 5
            }}"#
        )
        .unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        let opts = config.request_options();
        assert_eq!(opts.api_key, "sk_test_123");
        assert_eq!(opts.api_version.as_deref(), Some("2020-08-27"));
        assert_eq!(opts.connect_account.as_deref(), Some("acct_1"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn load_file_not_found() {
        let result = ClientConfig::load(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn load_rejects_empty_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"api_key": " "}}"#).unwrap();

        let result = ClientConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::MissingApiKey { .. })));
    }

    #[test]
    fn load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"api_base": "x"}}"#).unwrap();

        let result = ClientConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidJson { .. })));
    }

    #[test]
    fn from_lookup_reads_variables() {
        let vars: HashMap<&str, &str> = [
            (API_KEY_VAR, "sk_test_env"),
            (ACCOUNT_VAR, "acct_env"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_key, "sk_test_env");
        assert_eq!(config.connect_account.as_deref(), Some("acct_env"));
        assert_eq!(config.api_version, None);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn from_lookup_requires_key() {
        let result = ClientConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingApiKey { .. })));
    }
}
