//! Client configuration.
//!
//! [`ClientConfig`] mirrors the option set accepted by the RIPS connector:
//! transport settings, extra headers and an optional OAuth2 block. Every
//! field has a built-in default, so a partially specified JSON document or
//! a few builder calls override only what they mention.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RipsError};

pub(crate) const DEFAULT_BASE_URI: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport and authentication configuration for a [`RipsClient`](crate::RipsClient).
///
/// # Example
///
/// ```
/// use ripsapi::{ClientConfig, OAuth2Config};
///
/// let config = ClientConfig::new("https://api.rips.example")
///     .with_header("X-Trace", "1")
///     .with_oauth2(OAuth2Config {
///         client_id: Some("cli".to_string()),
///         ..Default::default()
///     });
/// assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(100)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URI of the RIPS API.
    pub base_uri: String,

    /// Overall request timeout, (fractional) seconds in JSON. Zero disables it.
    #[serde(with = "secs_f64")]
    pub timeout: Duration,

    /// Connect timeout, (fractional) seconds in JSON. Zero disables it.
    #[serde(with = "secs_f64")]
    pub connect_timeout: Duration,

    /// Accepted for compatibility only. Status codes are always inspected
    /// after the fact, so the transport never fails on a non-2xx response.
    pub http_errors: bool,

    /// Extra headers sent with every request. Merged key-wise with the
    /// headers the client adds itself.
    pub headers: BTreeMap<String, String>,

    /// OAuth2 settings. When absent the client authenticates with
    /// username/password headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2Config>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            http_errors: false,
            headers: BTreeMap::new(),
            oauth2: None,
        }
    }
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URI.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Default::default()
        }
    }

    /// Parse a JSON option document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a configuration from `RIPS_*` environment variables.
    ///
    /// - `RIPS_BASE_URI` - base URI (defaults to `http://localhost:8080`)
    /// - `RIPS_TIMEOUT`, `RIPS_CONNECT_TIMEOUT` - seconds, fractions allowed
    /// - `RIPS_CLIENT_ID`, `RIPS_ACCESS_TOKEN`, `RIPS_TOKEN_FILE`,
    ///   `RIPS_STORE_TOKEN` - any of these switches the client to OAuth2
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_uri) = lookup("RIPS_BASE_URI") {
            config.base_uri = base_uri;
        }
        if let Some(timeout) = lookup("RIPS_TIMEOUT") {
            config.timeout = parse_secs("RIPS_TIMEOUT", &timeout)?;
        }
        if let Some(timeout) = lookup("RIPS_CONNECT_TIMEOUT") {
            config.connect_timeout = parse_secs("RIPS_CONNECT_TIMEOUT", &timeout)?;
        }

        let access_token = lookup("RIPS_ACCESS_TOKEN");
        let client_id = lookup("RIPS_CLIENT_ID");
        let token_file_path = lookup("RIPS_TOKEN_FILE").map(PathBuf::from);
        let store_token = lookup("RIPS_STORE_TOKEN");

        if access_token.is_some()
            || client_id.is_some()
            || token_file_path.is_some()
            || store_token.is_some()
        {
            config.oauth2 = Some(OAuth2Config {
                access_token,
                client_id,
                token_file_path,
                store_token: store_token
                    .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false),
            });
        }

        Ok(config)
    }

    /// Set the overall request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Add or replace one extra header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Enable OAuth2 authentication.
    #[must_use]
    pub fn with_oauth2(mut self, oauth2: OAuth2Config) -> Self {
        self.oauth2 = Some(oauth2);
        self
    }

    /// Overall request timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        Some(self.timeout).filter(|t| !t.is_zero())
    }

    /// Connect timeout, `None` when disabled.
    pub fn connect_timeout(&self) -> Option<Duration> {
        Some(self.connect_timeout).filter(|t| !t.is_zero())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| {
            RipsError::ConfigMissing(format!("{key} must be a number of seconds, got '{value}'"))
        })
}

/// Durations as (fractional) seconds.
mod secs_f64 {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

/// OAuth2 options.
///
/// Empty strings are treated the same as missing values.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OAuth2Config {
    /// Pre-issued access token. Used as-is (after validation) when present.
    pub access_token: Option<String>,

    /// OAuth2 client id, needed only when a new token has to be minted.
    pub client_id: Option<String>,

    /// Token cache file.
    pub token_file_path: Option<PathBuf>,

    /// Persist newly minted tokens to `token_file_path`.
    pub store_token: bool,
}

impl std::fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("access_token", &self.access_token().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .field("token_file_path", &self.token_file_path)
            .field("store_token", &self.store_token)
            .finish()
    }
}

impl OAuth2Config {
    /// The pre-supplied token, if non-empty.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// The client id, if non-empty.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref().filter(|c| !c.is_empty())
    }

    /// The token cache path, if non-empty.
    pub fn token_file_path(&self) -> Option<&Path> {
        self.token_file_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_uri, "http://localhost:8080");
        assert_eq!(config.timeout(), Some(Duration::from_secs(100)));
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(10)));
        assert!(!config.http_errors);
        assert!(config.oauth2.is_none());
    }

    #[test]
    fn test_json_overrides_only_given_keys() {
        let config = ClientConfig::from_json(
            r#"{"base_uri": "https://rips.example", "timeout": 5, "headers": {"X-A": "1"}}"#,
        )
        .unwrap();

        assert_eq!(config.base_uri, "https://rips.example");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.headers.get("X-A").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_json_oauth2_block() {
        let config = ClientConfig::from_json(
            r#"{"oauth2": {"client_id": "cid", "token_file_path": "/tmp/t.json", "store_token": true}}"#,
        )
        .unwrap();

        let oauth2 = config.oauth2.unwrap();
        assert_eq!(oauth2.client_id(), Some("cid"));
        assert_eq!(oauth2.token_file_path(), Some(Path::new("/tmp/t.json")));
        assert!(oauth2.store_token);
        assert_eq!(oauth2.access_token(), None);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let oauth2 = OAuth2Config {
            access_token: Some(String::new()),
            client_id: Some(String::new()),
            token_file_path: Some(PathBuf::new()),
            store_token: true,
        };
        assert_eq!(oauth2.access_token(), None);
        assert_eq!(oauth2.client_id(), None);
        assert_eq!(oauth2.token_file_path(), None);
    }

    #[test]
    fn test_oauth2_debug_redacts_token() {
        let oauth2 = OAuth2Config {
            access_token: Some("secret-token".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", oauth2);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_from_lookup_basic_mode() {
        let config = ClientConfig::from_lookup(|key| match key {
            "RIPS_BASE_URI" => Some("https://rips.example/api".to_string()),
            "RIPS_TIMEOUT" => Some("30".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.base_uri, "https://rips.example/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.oauth2.is_none());
    }

    #[test]
    fn test_from_lookup_oauth2_mode() {
        let config = ClientConfig::from_lookup(|key| match key {
            "RIPS_CLIENT_ID" => Some("cid".to_string()),
            "RIPS_STORE_TOKEN" => Some("true".to_string()),
            "RIPS_TOKEN_FILE" => Some("/tmp/token.json".to_string()),
            _ => None,
        })
        .unwrap();

        let oauth2 = config.oauth2.expect("oauth2 should be enabled");
        assert_eq!(oauth2.client_id(), Some("cid"));
        assert!(oauth2.store_token);
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result = ClientConfig::from_lookup(|key| match key {
            "RIPS_TIMEOUT" => Some("soon".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(RipsError::ConfigMissing(_))));
    }

    #[test]
    fn test_fractional_timeouts() {
        let config =
            ClientConfig::from_json(r#"{"timeout": 2.5, "connect_timeout": 0.25}"#).unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.connect_timeout(), Some(Duration::from_millis(250)));

        let config = ClientConfig::from_lookup(|key| match key {
            "RIPS_TIMEOUT" => Some("0.5".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = ClientConfig::from_json(r#"{"timeout": 0}"#).unwrap();
        assert_eq!(config.timeout(), None);
        assert!(ClientConfig::from_json(r#"{"timeout": -1}"#).is_err());
    }
}
