//! Per-account screening session
//!
//! Wires one [`ScreeningConfig`] to a reqwest [`HttpClient`], a
//! [`CredentialManager`] and a [`RequestExecutor`]. Two accounts (say, a
//! search account and a monitoring account) are two sessions; nothing is
//! shared between them.

use std::sync::Arc;

use riskscreen_core::{ApiRequest, CredentialManager, RequestExecutor, RequestPerformer};
use riskscreen_domain::{Result, ScreeningConfig};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::http::HttpClient;

/// User agent sent on every call
pub const USER_AGENT: &str = concat!("riskscreen/", env!("CARGO_PKG_VERSION"));

/// Authenticated session against the screening API for one account
pub struct ScreeningSession {
    config: Arc<ScreeningConfig>,
    credentials: Arc<CredentialManager>,
    executor: RequestExecutor,
}

impl ScreeningSession {
    /// Validate `config` and build a session over a reqwest transport
    ///
    /// No network call is made; the first token is acquired on first use.
    ///
    /// # Errors
    /// `ScreeningError::Config` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn connect(config: ScreeningConfig) -> Result<Self> {
        config.validate()?;

        let client = HttpClient::builder().timeout(config.timeout).user_agent(USER_AGENT).build()?;

        Ok(Self::assemble(config, Arc::new(client)))
    }

    /// Validate `config` and build a session over a caller-supplied transport
    ///
    /// # Errors
    /// `ScreeningError::Config` if the configuration is invalid.
    pub fn with_performer(
        config: ScreeningConfig,
        performer: Arc<dyn RequestPerformer>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self::assemble(config, performer))
    }

    /// Wire an already-validated config to `performer`
    fn assemble(config: ScreeningConfig, performer: Arc<dyn RequestPerformer>) -> Self {
        let config = Arc::new(config);
        let credentials =
            Arc::new(CredentialManager::new(Arc::clone(&config), Arc::clone(&performer)));
        let executor = RequestExecutor::from_config(&config, credentials.clone(), performer);

        info!(client_id = %config.client_id, base_url = %config.base_url, "screening session ready");

        Self { config, credentials, executor }
    }

    /// Session configuration
    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Join `path` onto the configured base URL
    pub fn url(&self, path: &str) -> String {
        self.executor.url(path)
    }

    /// Perform an arbitrary API operation
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        self.executor.execute(request).await
    }

    /// Perform an API operation and decode its payload
    pub async fn execute_as<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.executor.execute_as(request).await
    }

    /// GET `path`
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.executor.get(path).await
    }

    /// POST `body` to `path`
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.executor.post(path, body).await
    }

    /// PATCH `path` with `body`
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.executor.patch(path, body).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.executor.delete(path).await
    }

    /// Current access token, acquiring or refreshing it if needed
    pub async fn access_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Force full re-authentication on the next call
    ///
    /// For use after the account's credentials were rotated out of band.
    pub async fn reset_authentication(&self) {
        self.credentials.invalidate().await;
    }
}
