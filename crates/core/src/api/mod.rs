//! Authorized API calls with one re-authentication retry

pub mod executor;
pub mod request;

pub use executor::RequestExecutor;
pub use request::ApiRequest;
