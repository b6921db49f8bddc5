//! Port interfaces for the screening session
//!
//! The executor and credential manager only ever talk to the network
//! through [`RequestPerformer`], and the executor only reaches credentials
//! through [`TokenProvider`]. Production wires in the reqwest adapter from
//! `riskscreen-infra`; tests wire in fakes.

use async_trait::async_trait;
use riskscreen_domain::{HttpRequest, HttpResponse, Result, TransportError};

/// Transport capability: perform one HTTP call
///
/// Implementations must make exactly one attempt and honour
/// `request.timeout`, reporting an exceeded deadline as
/// [`TransportError::Timeout`] rather than a connection failure.
#[async_trait]
pub trait RequestPerformer: Send + Sync {
    /// Perform `request` and return whatever the server answered
    ///
    /// Non-success statuses are returned as `Ok`; only failures that
    /// prevent a response from being read are `Err`.
    async fn perform(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Source of bearer tokens for authorized calls
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a currently-valid access token, acquiring or refreshing it
    /// if needed
    async fn get_token(&self) -> Result<String>;

    /// Discard cached credentials so the next `get_token` starts over
    async fn invalidate(&self);
}
