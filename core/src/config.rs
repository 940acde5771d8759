//! Host configuration and transport settings.
//!
//! [`HostConfig`] says which server to talk to and as whom. It is resolved
//! once at startup, from environment overrides or from the app's credential
//! store, and then mutated only through
//! [`crate::transport::TransportBinding`] so that every change is followed by
//! a transport rebuild.

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_ADDRESS: &str = "https://habitica.com";
pub const API_PREFIX: &str = "/api/v4";

/// Store key of the server address chosen in the app settings.
pub const SERVER_URL_KEY: &str = "server_url";
/// Store key of the signed-in user id.
pub const USER_ID_KEY: &str = "user_id";
/// Store key under which old app versions kept the api key in plaintext.
pub const LEGACY_TOKEN_KEY: &str = "APIToken";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostConfig {
    pub address: String,
    /// Empty means the scheme default.
    pub port: String,
    pub user_id: String,
    pub api_key: String,
}

impl HostConfig {
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: String::new(),
            user_id: user_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_address(
        address: impl Into<String>,
        port: impl Into<String>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            port: port.into(),
            user_id: user_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn has_authentication(&self) -> bool {
        !self.user_id.is_empty() && !self.api_key.is_empty()
    }

    /// API base url, always ending in `/api/v4/`.
    pub fn server_url(&self) -> Result<Url, ConfigError> {
        let trimmed = self.address.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(API_PREFIX).unwrap_or(trimmed);
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let mut url = Url::parse(&with_scheme).map_err(|e| ConfigError::InvalidAddress {
            address: self.address.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ConfigError::InvalidAddress {
                address: self.address.clone(),
                reason: "missing host".to_string(),
            });
        }
        if !self.port.trim().is_empty() {
            let port: u16 = self
                .port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(self.port.clone()))?;
            url.set_port(Some(port))
                .map_err(|_| ConfigError::InvalidPort(self.port.clone()))?;
        }
        let base = format!("{}{API_PREFIX}/", url.as_str().trim_end_matches('/'));
        Url::parse(&base).map_err(|e| ConfigError::InvalidAddress {
            address: self.address.clone(),
            reason: e.to_string(),
        })
    }

    /// Build-time overrides: `HABITICA_ADDRESS`, `HABITICA_PORT`,
    /// `HABITICA_USER_ID`, `HABITICA_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            address: env_var("HABITICA_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port: env_var("HABITICA_PORT").unwrap_or_default(),
            user_id: env_var("HABITICA_USER_ID").unwrap_or_default(),
            api_key: env_var("HABITICA_API_KEY").unwrap_or_default(),
        }
    }

    /// Resolve from the credential store, migrating a legacy plaintext key.
    ///
    /// A stored key is decrypted with `cipher`; without a cipher it cannot be
    /// read and the key resolves to `""`. The legacy `APIToken` entry is only
    /// removed once it has been re-stored encrypted.
    pub fn load(store: &dyn CredentialStore, cipher: Option<&dyn KeyCipher>) -> Self {
        let address = store
            .get(SERVER_URL_KEY)
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let user_id = store.get(USER_ID_KEY).unwrap_or_default();
        let api_key = load_api_key(store, cipher, &user_id);
        Self {
            address,
            port: String::new(),
            user_id,
            api_key,
        }
    }

    /// Environment test user if one is configured, the store otherwise.
    pub fn resolve(store: &dyn CredentialStore, cipher: Option<&dyn KeyCipher>) -> Self {
        if env_var("HABITICA_USER_ID").is_some() {
            tracing::info!("Using host configuration from environment");
            return Self::from_env();
        }
        let mut config = Self::load(store, cipher);
        if let Some(address) = env_var("HABITICA_ADDRESS") {
            config.address = address;
        }
        if let Some(port) = env_var("HABITICA_PORT") {
            config.port = port;
        }
        config
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_api_key(store: &dyn CredentialStore, cipher: Option<&dyn KeyCipher>, user_id: &str) -> String {
    if !user_id.is_empty() && store.contains(user_id) {
        let encrypted = store.get(user_id).unwrap_or_default();
        if encrypted.trim().is_empty() {
            return String::new();
        }
        return cipher.and_then(|c| c.decrypt(&encrypted)).unwrap_or_default();
    }

    let token = store.get(LEGACY_TOKEN_KEY).unwrap_or_default();
    if token.trim().is_empty() || user_id.is_empty() {
        return token;
    }
    match cipher.and_then(|c| c.encrypt(&token)) {
        Some(encrypted) => {
            store.set(user_id, &encrypted);
            store.remove(LEGACY_TOKEN_KEY);
            tracing::info!("Migrated legacy api token to encrypted storage");
        }
        None => tracing::warn!("No cipher available, leaving legacy api token in place"),
    }
    token
}

/// Persistent string key/value storage owned by the app.
pub trait CredentialStore {
    fn get(&self, key: &str) -> Option<String>;
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// At-rest encryption for the api key. `None` means the operation failed.
pub trait KeyCipher {
    fn encrypt(&self, plain: &str) -> Option<String>;
    fn decrypt(&self, encrypted: &str) -> Option<String>;
}

/// How much of each HTTP exchange the transport writes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpLogLevel {
    #[default]
    None,
    Basic,
    Headers,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    /// Sent as `x-client`.
    pub client_id: String,
    pub log_level: HttpLogLevel,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 30_000,
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            client_id: "habitica-core".to_string(),
            log_level: HttpLogLevel::None,
        }
    }
}

impl TransportSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(RefCell<HashMap<String, String>>);

    impl MemoryStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            let store = Self::default();
            for (k, v) in entries {
                store.set(k, v);
            }
            store
        }
    }

    impl CredentialStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }
        fn remove(&self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    /// Reverses the string; enough to tell encrypted from plain.
    struct Reverse;

    impl KeyCipher for Reverse {
        fn encrypt(&self, plain: &str) -> Option<String> {
            Some(plain.chars().rev().collect())
        }
        fn decrypt(&self, encrypted: &str) -> Option<String> {
            Some(encrypted.chars().rev().collect())
        }
    }

    #[test]
    fn authentication_needs_both_fields() {
        assert!(HostConfig::new("user", "key").has_authentication());
        assert!(!HostConfig::new("", "key").has_authentication());
        assert!(!HostConfig::new("user", "").has_authentication());
    }

    #[test]
    fn server_url_appends_api_prefix() {
        let url = HostConfig::new("", "").server_url().unwrap();
        assert_eq!(url.as_str(), "https://habitica.com/api/v4/");
    }

    #[test]
    fn server_url_applies_port_and_scheme() {
        let config = HostConfig::with_address("http://localhost", "3000", "", "");
        assert_eq!(config.server_url().unwrap().as_str(), "http://localhost:3000/api/v4/");

        let config = HostConfig::with_address("habitica.example.org/", "", "", "");
        assert_eq!(
            config.server_url().unwrap().as_str(),
            "https://habitica.example.org/api/v4/"
        );
    }

    #[test]
    fn server_url_does_not_repeat_prefix() {
        let config = HostConfig::with_address("http://127.0.0.1:8080/api/v4/", "", "", "");
        assert_eq!(config.server_url().unwrap().as_str(), "http://127.0.0.1:8080/api/v4/");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let config = HostConfig::with_address("http://localhost", "http", "", "");
        assert!(matches!(config.server_url(), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn load_decrypts_stored_key() {
        let store = MemoryStore::with(&[(USER_ID_KEY, "u1"), ("u1", "yek")]);
        let config = HostConfig::load(&store, Some(&Reverse));
        assert_eq!(config.user_id, "u1");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.address, DEFAULT_ADDRESS);
    }

    #[test]
    fn load_uses_stored_server_url() {
        let store = MemoryStore::with(&[(SERVER_URL_KEY, "http://10.0.2.2:3000")]);
        let config = HostConfig::load(&store, None);
        assert_eq!(config.address, "http://10.0.2.2:3000");
        assert!(!config.has_authentication());
    }

    #[test]
    fn load_migrates_legacy_token() {
        let store = MemoryStore::with(&[(USER_ID_KEY, "u1"), (LEGACY_TOKEN_KEY, "plain")]);
        let config = HostConfig::load(&store, Some(&Reverse));
        assert_eq!(config.api_key, "plain");
        assert_eq!(store.get("u1").as_deref(), Some("nialp"));
        assert!(store.get(LEGACY_TOKEN_KEY).is_none());
    }

    #[test]
    fn legacy_token_stays_without_cipher() {
        let store = MemoryStore::with(&[(USER_ID_KEY, "u1"), (LEGACY_TOKEN_KEY, "plain")]);
        let config = HostConfig::load(&store, None);
        assert_eq!(config.api_key, "plain");
        assert_eq!(store.get(LEGACY_TOKEN_KEY).as_deref(), Some("plain"));
        assert!(store.get("u1").is_none());
    }

    #[test]
    fn blank_stored_key_resolves_empty() {
        let store = MemoryStore::with(&[(USER_ID_KEY, "u1"), ("u1", " ")]);
        assert_eq!(HostConfig::load(&store, Some(&Reverse)).api_key, "");
    }

    #[test]
    fn settings_load_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transport.json");
        std::fs::write(&path, r#"{"read_timeout_ms": 500, "log_level": "body"}"#).unwrap();
        let settings = TransportSettings::load(&path).unwrap();
        assert_eq!(settings.read_timeout_ms, 500);
        assert_eq!(settings.connect_timeout_ms, 30_000);
        assert_eq!(settings.log_level, HttpLogLevel::Body);
    }

    #[test]
    fn settings_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transport.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(TransportSettings::load(&path), Err(ConfigError::Parse(_))));
    }
}
