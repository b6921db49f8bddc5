//! Common utilities shared across RiskScreen crates.
//!
//! # Modules
//!
//! - [`security`]: secret handling (`SecureString`)
//! - [`time`]: wall-clock abstraction for deterministic expiry tests
//!
//! This crate has no knowledge of the screening API; it only carries
//! cross-cutting building blocks the other crates lean on.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod security;
pub mod time;

// Re-export commonly used types and traits for convenience
pub use security::SecureString;
pub use time::{Clock, MockClock, SystemClock};
