//! Two-stage OAuth credential acquisition

pub mod credential_manager;
pub mod exchange;

pub use credential_manager::CredentialManager;
