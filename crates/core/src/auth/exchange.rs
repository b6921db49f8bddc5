//! Token endpoint exchanges
//!
//! Builds the three token requests and decodes their responses:
//!
//! | Exchange | Encoding | Grant type |
//! |----------|----------|------------|
//! | identity (stage 1) | form | `password` |
//! | access (stage 2) | form | `urn:ietf:params:oauth:grant-type:jwt-bearer` |
//! | refresh | JSON | `refresh_token` |
//!
//! Every failure except a transport timeout surfaces as
//! [`ScreeningError::Authentication`]. Nothing here retries.

use riskscreen_domain::constants::{AUTHN_GRANT_TYPE, AUTHZ_GRANT_TYPE, REFRESH_GRANT_TYPE};
use riskscreen_domain::{
    Failure, HttpMethod, HttpRequest, IdentityAssertion, IdentityGrant, Result, ScreeningConfig,
    ScreeningError, TransportError,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::outcome::classify_response;
use crate::ports::RequestPerformer;

/// Stage-1 request: trade account credentials for an identity assertion
pub fn identity_request(config: &ScreeningConfig) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, &config.auth_url, config.timeout).with_form(vec![
        ("client_id".into(), config.client_id.clone()),
        ("connection".into(), config.connection.clone()),
        ("grant_type".into(), AUTHN_GRANT_TYPE.into()),
        ("password".into(), config.password.expose().to_string()),
        ("scope".into(), config.authn_scope.clone()),
        ("username".into(), config.username.clone()),
        ("device".into(), config.device.clone()),
    ])
}

/// Stage-2 request: trade the identity token for an access token
pub fn access_request(config: &ScreeningConfig, identity: &IdentityAssertion) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, &config.auth_url, config.timeout).with_form(vec![
        ("assertion".into(), identity.id_token().to_string()),
        ("client_id".into(), config.client_id.clone()),
        ("grant_type".into(), AUTHZ_GRANT_TYPE.into()),
        ("scope".into(), config.authz_scope.clone()),
    ])
}

/// Refresh request: trade a refresh token for a new access token
pub fn refresh_request(config: &ScreeningConfig, refresh_token: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, &config.auth_url, config.timeout)
        .with_header("Content-Type", "application/json")
        .with_json(json!({
            "client_id": config.client_id,
            "grant_type": REFRESH_GRANT_TYPE,
            "refresh_token": refresh_token,
            "scope": config.authn_scope,
        }))
}

/// Perform a token request and decode the grant it returns
///
/// # Errors
/// - `ScreeningError::Timeout` if the auth endpoint exceeded the timeout
/// - `ScreeningError::Authentication` for every other failure: unreachable
///   endpoint, non-success status, or a body that is not the expected grant
pub async fn exchange<T: DeserializeOwned>(
    performer: &dyn RequestPerformer,
    request: HttpRequest,
) -> Result<T> {
    let url = request.url.clone();
    let timeout = request.timeout;

    debug!(url = %url, "posting token request");

    let response = performer.perform(request).await.map_err(|err| match err {
        TransportError::Timeout => {
            warn!(url = %url, timeout = ?timeout, "token request timed out");
            ScreeningError::Timeout { url: url.clone(), timeout }
        }
        TransportError::Connection(message) => {
            ScreeningError::authentication(Failure::connection(message))
        }
    })?;

    let document = classify_response(&response).map_err(ScreeningError::authentication)?;

    serde_json::from_value(document).map_err(|e| {
        ScreeningError::authentication(Failure::parse(format!("unexpected token response: {e}")))
    })
}

/// Decode a stage-1 grant into an identity assertion
pub fn into_identity(grant: IdentityGrant) -> IdentityAssertion {
    IdentityAssertion::new(grant.id_token, grant.refresh_token.map(Into::into))
}
