//! OAuth artifacts held by the credential manager
//!
//! Both cached values are immutable once built. A refresh never edits a
//! [`Credential`] in place; it produces a new one and swaps the pointer, so
//! readers holding the old `Arc` keep a consistent value.

use chrono::{DateTime, TimeDelta, Utc};
use riskscreen_common::SecureString;
use serde::Deserialize;

/// Output of the identity exchange (stage 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    id_token: SecureString,
    refresh_token: Option<SecureString>,
}

impl IdentityAssertion {
    /// Create an identity assertion
    pub fn new(id_token: impl Into<SecureString>, refresh_token: Option<SecureString>) -> Self {
        Self { id_token: id_token.into(), refresh_token }
    }

    /// Identity token, traded for an access token in stage 2
    pub fn id_token(&self) -> &str {
        self.id_token.expose()
    }

    /// Refresh token, if the identity provider issued one
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(SecureString::expose)
    }

    /// Copy of this assertion carrying a rotated refresh token
    #[must_use]
    pub fn with_refresh_token(&self, refresh_token: impl Into<SecureString>) -> Self {
        Self { id_token: self.id_token.clone(), refresh_token: Some(refresh_token.into()) }
    }
}

/// A currently-held access grant
///
/// Valid while `now < expires_at`, stale from `expires_at` on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: SecureString,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// Build a credential acquired at `acquired_at` that lives
    /// `expires_in_secs` seconds
    pub fn issue(
        access_token: impl Into<SecureString>,
        expires_in_secs: u64,
        acquired_at: DateTime<Utc>,
    ) -> Self {
        let lifetime = i64::try_from(expires_in_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let expires_at = acquired_at.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { access_token: access_token.into(), expires_at }
    }

    /// Bearer token value
    pub fn access_token(&self) -> &str {
        self.access_token.expose()
    }

    /// Absolute expiry
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True while `now` is strictly before the expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Seconds left before expiry at `now`; negative once stale
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

/// Stage-1 token endpoint response
#[derive(Debug, Deserialize)]
pub struct IdentityGrant {
    /// Identity token
    pub id_token: String,
    /// Refresh token, usually issued because of the `offline_access` scope
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Stage-2 and refresh token endpoint response
#[derive(Debug, Deserialize)]
pub struct AccessGrant {
    /// Bearer access token
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
    /// Rotated refresh token, if the server issued one
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn credential_valid_until_exact_expiry() {
        let credential = Credential::issue("X", 3600, t0());

        assert!(credential.is_valid_at(t0()));
        assert!(credential.is_valid_at(t0() + TimeDelta::seconds(3599)));
        assert!(!credential.is_valid_at(t0() + TimeDelta::seconds(3600)));
        assert!(!credential.is_valid_at(t0() + TimeDelta::seconds(7200)));
    }

    #[test]
    fn credential_reports_remaining_lifetime() {
        let credential = Credential::issue("X", 100, t0());
        assert_eq!(credential.expires_at(), t0() + TimeDelta::seconds(100));
        assert_eq!(credential.seconds_until_expiry(t0() + TimeDelta::seconds(40)), 60);
        assert_eq!(credential.seconds_until_expiry(t0() + TimeDelta::seconds(150)), -50);
    }

    #[test]
    fn zero_lifetime_is_immediately_stale() {
        let credential = Credential::issue("X", 0, t0());
        assert!(!credential.is_valid_at(t0()));
    }

    #[test]
    fn huge_lifetime_saturates() {
        let credential = Credential::issue("X", u64::MAX, t0());
        assert!(credential.is_valid_at(t0() + TimeDelta::days(365 * 100)));
    }

    #[test]
    fn debug_never_prints_tokens() {
        let credential = Credential::issue("very-secret-token", 10, t0());
        let identity = IdentityAssertion::new("id-jwt", Some(SecureString::new("refresh-me")));
        let rendered = format!("{credential:?} {identity:?}");
        assert!(!rendered.contains("very-secret-token"));
        assert!(!rendered.contains("id-jwt"));
        assert!(!rendered.contains("refresh-me"));
    }

    #[test]
    fn rotated_identity_keeps_id_token() {
        let identity = IdentityAssertion::new("A", Some(SecureString::new("R")));
        let rotated = identity.with_refresh_token("R2");
        assert_eq!(rotated.id_token(), "A");
        assert_eq!(rotated.refresh_token(), Some("R2"));
        assert_eq!(identity.refresh_token(), Some("R"));
    }

    #[test]
    fn grants_deserialize_from_token_endpoint_bodies() {
        let identity: IdentityGrant =
            serde_json::from_str(r#"{"id_token":"A","refresh_token":"R","token_type":"Bearer"}"#)
                .unwrap();
        assert_eq!(identity.id_token, "A");
        assert_eq!(identity.refresh_token.as_deref(), Some("R"));

        let access: AccessGrant =
            serde_json::from_str(r#"{"access_token":"X","expires_in":100}"#).unwrap();
        assert_eq!(access.access_token, "X");
        assert_eq!(access.expires_in, 100);
        assert!(access.refresh_token.is_none());
    }
}
