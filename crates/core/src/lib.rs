//! # RiskScreen Core
//!
//! Session logic for the risk screening client - no HTTP stack.
//!
//! This crate contains:
//! - [`CredentialManager`]: two-stage OAuth acquisition, cached and lazily
//!   refreshed
//! - [`RequestExecutor`]: authorized calls with one re-authentication retry
//! - Port interfaces ([`RequestPerformer`], [`TokenProvider`])
//!
//! ## Architecture Principles
//! - Only depends on `riskscreen-common` and `riskscreen-domain`
//! - All network access goes through [`RequestPerformer`]
//! - The transport adapter lives in `riskscreen-infra`

pub mod api;
pub mod auth;
pub mod outcome;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use api::{ApiRequest, RequestExecutor};
pub use auth::CredentialManager;
pub use outcome::classify_response;
pub use ports::{RequestPerformer, TokenProvider};
