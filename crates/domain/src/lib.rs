//! # RiskScreen Domain
//!
//! Data types for the risk screening client.
//!
//! This crate contains:
//! - Per-account configuration ([`ScreeningConfig`])
//! - The error taxonomy and per-attempt outcome type
//! - Transport request/response values and cached OAuth artifacts
//! - Constants fixed by the remote OAuth contract
//!
//! ## Architecture
//! - Depends only on `riskscreen-common`
//! - No I/O; every type here is a plain value

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::ScreeningConfig;
pub use errors::{Failure, FailureKind, RequestOutcome, Result, ScreeningError};
pub use types::{
    AccessGrant, Credential, HttpMethod, HttpRequest, HttpResponse, IdentityAssertion, IdentityGrant,
    RequestBody, TransportError,
};
