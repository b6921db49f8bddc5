//! Constants fixed by the screening API's OAuth contract.

/// Grant type of the identity exchange (stage 1)
pub const AUTHN_GRANT_TYPE: &str = "password";

/// Grant type of the access exchange (stage 2)
pub const AUTHZ_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Grant type of the refresh exchange
pub const REFRESH_GRANT_TYPE: &str = "refresh_token";

/// Default scope requested by the identity and refresh exchanges
pub const DEFAULT_AUTHN_SCOPE: &str = "openid service_account_id offline_access:";

/// Default scope requested by the access exchange
pub const DEFAULT_AUTHZ_SCOPE: &str = "openid pib";

/// Default identity connection name
pub const DEFAULT_CONNECTION: &str = "service-account";

/// Default timeout applied to every network call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Media type negotiated with the API unless a caller overrides it
pub const JSON_MEDIA_TYPE: &str = "application/json";
