//! Per-account configuration
//!
//! A [`ScreeningConfig`] is resolved once per logical account and then
//! treated as immutable. How it is loaded (env, files, secret store) is up
//! to the host; the type derives `Deserialize` so any serde format works.

use std::fmt;
use std::time::Duration;

use riskscreen_common::SecureString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_AUTHN_SCOPE, DEFAULT_AUTHZ_SCOPE, DEFAULT_CONNECTION, DEFAULT_TIMEOUT_SECS,
};
use crate::errors::{Result, ScreeningError};

/// Connection settings and identity parameters for one API account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// OAuth token endpoint used by all three exchanges
    pub auth_url: String,
    /// Root of the resource API; endpoint paths are joined onto it
    pub base_url: String,
    /// Timeout applied to every network call, auth and resource alike
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,
    /// OAuth client id
    pub client_id: String,
    /// Service account user name
    pub username: String,
    /// Service account password
    pub password: SecureString,
    /// Identity connection name
    #[serde(default = "default_connection")]
    pub connection: String,
    /// Device identifier reported during the identity exchange
    pub device: String,
    /// Scope for the identity and refresh exchanges
    #[serde(default = "default_authn_scope")]
    pub authn_scope: String,
    /// Scope for the access exchange
    #[serde(default = "default_authz_scope")]
    pub authz_scope: String,
}

impl ScreeningConfig {
    /// Create a config with contract defaults for connection, scopes and
    /// timeout
    pub fn new(
        auth_url: impl Into<String>,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecureString>,
        device: impl Into<String>,
    ) -> Self {
        Self {
            auth_url: auth_url.into(),
            base_url: base_url.into(),
            timeout: default_timeout(),
            client_id: client_id.into(),
            username: username.into(),
            password: password.into(),
            connection: default_connection(),
            device: device.into(),
            authn_scope: default_authn_scope(),
            authz_scope: default_authz_scope(),
        }
    }

    /// Override the network timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the identity connection name
    #[must_use]
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = connection.into();
        self
    }

    /// Override both OAuth scopes
    #[must_use]
    pub fn with_scopes(
        mut self,
        authn_scope: impl Into<String>,
        authz_scope: impl Into<String>,
    ) -> Self {
        self.authn_scope = authn_scope.into();
        self.authz_scope = authz_scope.into();
        self
    }

    /// Check that the config can drive a session
    ///
    /// # Errors
    /// Returns `ScreeningError::Config` if a required identity field is
    /// empty, the timeout is zero, or either URL is not an absolute
    /// http(s) URL.
    pub fn validate(&self) -> Result<()> {
        require_http_url("auth_url", &self.auth_url)?;
        require_http_url("base_url", &self.base_url)?;

        for (field, value) in [
            ("client_id", self.client_id.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.expose()),
        ] {
            if value.trim().is_empty() {
                return Err(ScreeningError::Config(format!("{field} must not be empty")));
            }
        }

        if self.timeout.is_zero() {
            return Err(ScreeningError::Config("timeout must be greater than zero".into()));
        }

        Ok(())
    }
}

impl fmt::Debug for ScreeningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreeningConfig")
            .field("auth_url", &self.auth_url)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"***")
            .field("connection", &self.connection)
            .field("device", &self.device)
            .field("authn_scope", &self.authn_scope)
            .field("authz_scope", &self.authz_scope)
            .finish()
    }
}

fn require_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = Url::parse(value)
        .map_err(|e| ScreeningError::Config(format!("{field} is not a valid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ScreeningError::Config(format!(
            "{field} must use http or https, got scheme '{other}'"
        ))),
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

fn default_connection() -> String {
    DEFAULT_CONNECTION.to_string()
}

fn default_authn_scope() -> String {
    DEFAULT_AUTHN_SCOPE.to_string()
}

fn default_authz_scope() -> String {
    DEFAULT_AUTHZ_SCOPE.to_string()
}

/// Serialize a `Duration` as whole seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScreeningConfig {
        ScreeningConfig::new(
            "https://auth.example.com/oauth2/v1/token",
            "https://api.example.com/",
            "client-123",
            "svc@example.com",
            "pa55word",
            "device-1",
        )
    }

    #[test]
    fn new_applies_contract_defaults() {
        let config = sample();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connection, "service-account");
        assert_eq!(config.authn_scope, "openid service_account_id offline_access:");
        assert_eq!(config.authz_scope, "openid pib");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = sample()
            .with_timeout(Duration::from_secs(5))
            .with_connection("custom")
            .with_scopes("openid", "openid extra");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connection, "custom");
        assert_eq!(config.authn_scope, "openid");
        assert_eq!(config.authz_scope, "openid extra");
    }

    #[test]
    fn debug_masks_password() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("client-123"));
        assert!(!rendered.contains("pa55word"));
    }

    #[test]
    fn validate_rejects_empty_identity_fields() {
        let mut config = sample();
        config.username = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ScreeningError::Config(ref m) if m.contains("username")));

        let mut config = sample();
        config.password = SecureString::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let mut config = sample();
        config.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ScreeningError::Config(_))));

        let mut config = sample();
        config.auth_url = "ftp://auth.example.com/token".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = sample().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ScreeningConfig = serde_json::from_str(
            r#"{
                "auth_url": "https://auth.example.com/token",
                "base_url": "https://api.example.com",
                "client_id": "cid",
                "username": "user",
                "password": "secret",
                "device": "dev"
            }"#,
        )
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connection, "service-account");
        assert_eq!(config.password.expose(), "secret");
    }

    #[test]
    fn timeout_round_trips_as_seconds() {
        let config = sample().with_timeout(Duration::from_secs(12));
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["timeout"], 12);
        assert_eq!(value["password"], "***");
    }
}
