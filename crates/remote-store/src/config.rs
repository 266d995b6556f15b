//! Connection parameters shared by every request a [`crate::RemoteStore`] issues.
//!
//! A [`ClientConfig`] is built once and moved into the store at construction;
//! the store never observes later changes. Two stores built from different
//! configs share nothing.
//!
//! # Environment
//!
//! [`ClientConfig::from_env`] reads:
//!
//! - `FLAGS_API_USERNAME` / `FLAGS_API_PASSWORD` — basic-auth pair
//! - `FLAGS_API_READ_TIMEOUT_SECS` / `FLAGS_API_OPEN_TIMEOUT_SECS`
//! - `FLAGS_API_HEADERS` — comma separated `Name=Value` pairs

use std::collections::BTreeMap;
use std::time::Duration;

use flags::StoreError;
use secrecy::{ExposeSecret, SecretString};

/// Headers sent with every request unless overridden.
pub const BASE_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json"),
];

/// Headers, credentials, and timeouts applied to every request.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    headers: BTreeMap<String, String>,
    username: Option<String>,
    password: Option<SecretString>,
    read_timeout: Option<Duration>,
    open_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a config with no extra headers, no auth, and transport-default timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the basic-auth username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the basic-auth password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Sets both halves of the basic-auth pair.
    pub fn with_basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.with_username(username).with_password(password)
    }

    /// Limits how long to wait for response data.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Limits how long to wait for a connection to open.
    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    /// Builds a config from `FLAGS_API_*` environment variables.
    ///
    /// Unset variables leave the corresponding setting at its default.
    ///
    /// # Errors
    ///
    /// [`StoreError::Configuration`] if a timeout is not a whole number of
    /// seconds or a header entry is not `Name=Value`.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let mut config = Self::new();

        if let Some(username) = lookup("FLAGS_API_USERNAME") {
            config = config.with_username(username);
        }
        if let Some(password) = lookup("FLAGS_API_PASSWORD") {
            config = config.with_password(password);
        }
        if let Some(secs) = lookup("FLAGS_API_READ_TIMEOUT_SECS") {
            config = config.with_read_timeout(parse_secs("FLAGS_API_READ_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("FLAGS_API_OPEN_TIMEOUT_SECS") {
            config = config.with_open_timeout(parse_secs("FLAGS_API_OPEN_TIMEOUT_SECS", &secs)?);
        }
        if let Some(headers) = lookup("FLAGS_API_HEADERS") {
            for entry in headers.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                let (name, value) = entry.split_once('=').ok_or_else(|| {
                    StoreError::configuration(format!(
                        "FLAGS_API_HEADERS entry {entry:?} is not Name=Value"
                    ))
                })?;
                config = config.with_header(name.trim(), value.trim());
            }
        }

        Ok(config)
    }

    /// Returns the headers to send: the base headers overlaid with configured ones.
    ///
    /// Names compare case-insensitively, so a configured `content-type`
    /// replaces the base `Content-Type`.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = BASE_HEADERS
            .iter()
            .filter(|(name, _)| !self.headers.keys().any(|k| k.eq_ignore_ascii_case(name)))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        merged.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Returns the basic-auth pair, only if both halves are configured.
    ///
    /// A lone username or password disables authentication.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                Some((username.as_str(), password.expose_secret().as_str()))
            }
            _ => None,
        }
    }

    /// Returns the configured read timeout, if any.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Returns the configured connection-open timeout, if any.
    pub fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout
    }
}

fn parse_secs(name: &str, value: &str) -> Result<Duration, StoreError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| StoreError::configuration(format!("{name}={value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn default_headers_are_json() {
        let headers = ClientConfig::new().headers();
        assert_eq!(
            headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn configured_headers_override_base_headers_case_insensitively() {
        let headers = ClientConfig::new()
            .with_header("accept", "application/vnd.flags+json")
            .with_header("X-Client", "flagctl")
            .headers();
        assert_eq!(headers.len(), 3);
        assert!(headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(headers.contains(&(
            "accept".to_string(),
            "application/vnd.flags+json".to_string()
        )));
        assert!(headers.contains(&("X-Client".to_string(), "flagctl".to_string())));
    }

    #[test]
    fn basic_auth_requires_both_halves() {
        assert!(ClientConfig::new().with_username("admin").basic_auth().is_none());
        assert!(ClientConfig::new().with_password("secret").basic_auth().is_none());
        assert_eq!(
            ClientConfig::new().with_basic_auth("admin", "secret").basic_auth(),
            Some(("admin", "secret"))
        );
    }

    #[test]
    fn password_is_redacted_in_debug_output() {
        let config = ClientConfig::new().with_basic_auth("admin", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn from_lookup_reads_every_setting() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FLAGS_API_USERNAME", "admin"),
            ("FLAGS_API_PASSWORD", "secret"),
            ("FLAGS_API_READ_TIMEOUT_SECS", "5"),
            ("FLAGS_API_OPEN_TIMEOUT_SECS", " 2 "),
            ("FLAGS_API_HEADERS", "X-Team=growth, X-Env = staging"),
        ]))
        .unwrap();

        assert_eq!(config.basic_auth(), Some(("admin", "secret")));
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.open_timeout(), Some(Duration::from_secs(2)));
        let headers = config.headers();
        assert!(headers.contains(&("X-Team".to_string(), "growth".to_string())));
        assert!(headers.contains(&("X-Env".to_string(), "staging".to_string())));
    }

    #[test]
    fn from_lookup_with_nothing_set_is_the_default() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.basic_auth().is_none());
        assert!(config.read_timeout().is_none());
        assert!(config.open_timeout().is_none());
        assert_eq!(config.headers().len(), 2);
    }

    #[test]
    fn from_lookup_rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[("FLAGS_API_READ_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, StoreError::Configuration { .. }));

        let err =
            ClientConfig::from_lookup(lookup(&[("FLAGS_API_HEADERS", "X-Team")])).unwrap_err();
        assert!(err.to_string().contains("X-Team"));
    }
}
