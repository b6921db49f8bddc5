//! Domain value types
//!
//! - [`http`]: the transport capability's request/response values
//! - [`auth`]: cached OAuth artifacts and token-endpoint wire shapes

pub mod auth;
pub mod http;

pub use auth::{AccessGrant, Credential, IdentityAssertion, IdentityGrant};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, TransportError};
