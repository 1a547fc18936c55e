//! Configuration loading for the mailbox engine
//!
//! Smart-reply credentials are looked up in order of priority:
//! 1. Compile-time embedded API key (for production builds)
//! 2. JSON file in the config directory
//! 3. Runtime environment variables (fallback)
//!
//! User settings live in `settings.json` next to the credentials.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::DEFAULT_SIGNATURE;

/// Credentials filename in the KMail config directory
const CREDENTIALS_FILE: &str = "gemini-credentials.json";

/// Settings filename in the KMail config directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variables checked at runtime, in order
const ENV_KEYS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// API credentials for the Gemini smart-reply service
#[derive(Debug, Clone)]
pub struct SmartReplyCredentials {
    pub api_key: String,
    pub model: String,
}

/// Credential file format
#[derive(Deserialize)]
struct CredentialFile {
    api_key: Option<String>,
    model: Option<String>,
}

impl SmartReplyCredentials {
    /// Load credentials using the following priority:
    /// 1. Compile-time embedded key
    /// 2. JSON file (~/.config/kmail/gemini-credentials.json)
    /// 3. Runtime environment variables
    pub fn load() -> Result<Self> {
        if let Some(creds) = Self::from_compile_time() {
            return Ok(creds);
        }

        if config::config_exists(CREDENTIALS_FILE) {
            let creds: CredentialFile = config::load_json(CREDENTIALS_FILE)?;
            return Self::from_credential_file(creds);
        }

        Self::from_env()
    }

    /// Key embedded at compile time.
    /// Build with: GEMINI_API_KEY=xxx cargo build --release
    pub fn from_compile_time() -> Option<Self> {
        let api_key = option_env!("GEMINI_API_KEY")?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self::new(api_key))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let creds: CredentialFile = config::load_json_file(path)?;
        Self::from_credential_file(creds)
    }

    fn from_credential_file(creds: CredentialFile) -> Result<Self> {
        let api_key = creds
            .api_key
            .filter(|k| !k.is_empty())
            .context("Credentials file missing 'api_key'")?;

        let mut loaded = Self::new(api_key);
        if let Some(model) = creds.model.filter(|m| !m.is_empty()) {
            loaded.model = model;
        }
        Ok(loaded)
    }

    /// Parse credentials from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let creds: CredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Self::from_credential_file(creds)
    }

    /// Load the key from `GEMINI_API_KEY`, then `API_KEY`
    pub fn from_env() -> Result<Self> {
        ENV_KEYS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
            .map(Self::new)
            .context("GEMINI_API_KEY environment variable not set")
    }

    /// Get the default credentials file path
    pub fn default_credentials_path() -> Option<PathBuf> {
        config::config_path(CREDENTIALS_FILE)
    }

    /// Check if credentials are available (compile-time, file, or env vars)
    pub fn is_available() -> bool {
        if Self::from_compile_time().is_some() {
            return true;
        }
        if config::config_exists(CREDENTIALS_FILE) {
            return true;
        }
        ENV_KEYS.iter().any(|name| std::env::var(name).is_ok_and(|v| !v.is_empty()))
    }
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxSettings {
    /// Database file overriding the default in the data directory
    pub database_path: Option<PathBuf>,
    /// Signature seeded into a fresh store
    pub default_signature: String,
    /// Gemini model used for smart replies
    pub smart_reply_model: String,
}

impl Default for MailboxSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            default_signature: DEFAULT_SIGNATURE.to_string(),
            smart_reply_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl MailboxSettings {
    /// Load `settings.json`, or defaults when it does not exist
    pub fn load() -> Result<Self> {
        if !config::config_exists(SETTINGS_FILE) {
            return Ok(Self::default());
        }
        config::load_json(SETTINGS_FILE)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    pub fn save(&self) -> Result<()> {
        config::save_json(SETTINGS_FILE, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credentials() {
        let json = r#"{ "api_key": "test-key", "model": "gemini-pro" }"#;
        let creds = SmartReplyCredentials::from_json(json).unwrap();
        assert_eq!(creds.api_key, "test-key");
        assert_eq!(creds.model, "gemini-pro");
    }

    #[test]
    fn test_model_defaults() {
        let creds = SmartReplyCredentials::from_json(r#"{ "api_key": "k" }"#).unwrap();
        assert_eq!(creds.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_key_is_error() {
        assert!(SmartReplyCredentials::from_json(r#"{ "model": "m" }"#).is_err());
        assert!(SmartReplyCredentials::from_json(r#"{ "api_key": "" }"#).is_err());
        assert!(SmartReplyCredentials::from_json("not json").is_err());
    }

    #[test]
    fn test_settings_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "default_signature": "Best, Me" }"#).unwrap();

        let settings = MailboxSettings::from_file(&path).unwrap();
        assert_eq!(settings.default_signature, "Best, Me");
        assert_eq!(settings.smart_reply_model, DEFAULT_MODEL);
        assert!(settings.database_path.is_none());
    }
}
