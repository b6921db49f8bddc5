//! # RiskScreen Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpClient`] implementing `RequestPerformer`
//! - [`ScreeningSession`], the per-account facade hosts talk to
//!
//! ## Architecture
//! - Implements traits defined in `riskscreen-core`
//! - Contains all "impure" code (sockets, TLS)

pub mod errors;
pub mod http;
pub mod session;

// Re-export commonly used items
pub use http::{HttpClient, HttpClientBuilder};
pub use riskscreen_core::ApiRequest;
pub use riskscreen_domain::{ScreeningConfig, ScreeningError};
pub use session::ScreeningSession;
