//! Resilient request executor
//!
//! Every API operation goes through [`RequestExecutor::execute`]:
//! 1. get a token from the [`TokenProvider`]; failure is terminal
//! 2. send the call with `Authorization: Bearer <token>`
//! 3. classify the result into a [`RequestOutcome`]
//! 4. on any failure except a timeout, invalidate the credentials and
//!    repeat steps 1-3 once
//! 5. a second failure is returned as [`ScreeningError::Request`]
//!
//! The retry is unconditional on failure class, not just on 401/403: the
//! remote API does not reliably tell an expired token apart from other
//! transient failures. Timeouts are never retried.

use std::sync::Arc;
use std::time::Duration;

use riskscreen_domain::constants::JSON_MEDIA_TYPE;
use riskscreen_domain::{
    Failure, FailureKind, HttpRequest, RequestOutcome, Result, ScreeningConfig, ScreeningError,
    TransportError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::request::ApiRequest;
use crate::outcome::classify_response;
use crate::ports::{RequestPerformer, TokenProvider};

/// Performs authorized API calls with one re-authentication retry
pub struct RequestExecutor {
    tokens: Arc<dyn TokenProvider>,
    performer: Arc<dyn RequestPerformer>,
    base_url: String,
    timeout: Duration,
}

impl RequestExecutor {
    /// Create an executor
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        performer: Arc<dyn RequestPerformer>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self { tokens, performer, base_url: base_url.into(), timeout }
    }

    /// Create an executor using the base URL and timeout from `config`
    pub fn from_config(
        config: &ScreeningConfig,
        tokens: Arc<dyn TokenProvider>,
        performer: Arc<dyn RequestPerformer>,
    ) -> Self {
        Self::new(tokens, performer, config.base_url.clone(), config.timeout)
    }

    /// Join `path` onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Perform `request`, retrying once after re-authentication
    ///
    /// Returns the parsed JSON payload; an empty success body is `{}`.
    ///
    /// # Errors
    /// - `ScreeningError::Timeout` as soon as any call times out
    /// - `ScreeningError::Authentication` if a token cannot be obtained
    /// - `ScreeningError::Request` with the second attempt's failure
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let first = match self.attempt(&request).await? {
            Ok(payload) => return Ok(payload),
            Err(failure) => failure,
        };

        if !first.is_retryable() {
            return Err(self.terminal(&request, first));
        }

        warn!(
            kind = %first.kind,
            status = ?first.status,
            code = ?first.code,
            "request failed; resetting authentication and retrying once"
        );
        self.tokens.invalidate().await;

        match self.attempt(&request).await? {
            Ok(payload) => {
                debug!("retry succeeded");
                Ok(payload)
            }
            Err(second) => {
                warn!(kind = %second.kind, status = ?second.status, "retry failed");
                Err(self.terminal(&request, second))
            }
        }
    }

    /// Perform `request` and decode the payload into `T`
    ///
    /// # Errors
    /// As [`execute`](Self::execute); a payload that does not decode into
    /// `T` is `ScreeningError::Request` with a `ParseFailed` failure and is
    /// not retried.
    pub async fn execute_as<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let payload = self.execute(request).await?;
        serde_json::from_value(payload).map_err(|e| {
            ScreeningError::Request(Failure::parse(format!("unexpected response payload: {e}")))
        })
    }

    /// GET `path` relative to the base URL
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(ApiRequest::get(self.url(path))).await
    }

    /// POST `body` to `path` relative to the base URL
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(ApiRequest::post(self.url(path), body)).await
    }

    /// PATCH `path` relative to the base URL with `body`
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(ApiRequest::patch(self.url(path), body)).await
    }

    /// DELETE `path` relative to the base URL
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.execute(ApiRequest::delete(self.url(path))).await
    }

    /// One token fetch and one HTTP call
    ///
    /// The outer `Err` is a token failure, which ends the operation.
    async fn attempt(&self, request: &ApiRequest) -> Result<RequestOutcome> {
        let token = self.tokens.get_token().await?;

        let outcome = match self.performer.perform(self.build(request, &token)).await {
            Ok(response) => classify_response(&response),
            Err(TransportError::Timeout) => Err(Failure::timeout(format!(
                "no response from {} within {:?}",
                request.url, self.timeout
            ))),
            Err(TransportError::Connection(message)) => Err(Failure::connection(message)),
        };

        Ok(outcome)
    }

    fn build(&self, request: &ApiRequest, token: &str) -> HttpRequest {
        let mut headers = vec![
            ("Accept".to_string(), JSON_MEDIA_TYPE.to_string()),
            ("Content-Type".to_string(), JSON_MEDIA_TYPE.to_string()),
        ];

        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        headers.push(("Authorization".to_string(), format!("Bearer {token}")));

        let mut http = HttpRequest::new(request.method, request.url.clone(), self.timeout);
        http.headers = headers;
        if let Some(body) = &request.body {
            http = http.with_json(body.clone());
        }
        http
    }

    fn terminal(&self, request: &ApiRequest, failure: Failure) -> ScreeningError {
        match failure.kind {
            FailureKind::Timeout => {
                warn!(url = %request.url, timeout = ?self.timeout, "request timed out");
                ScreeningError::Timeout { url: request.url.clone(), timeout: self.timeout }
            }
            _ => ScreeningError::Request(failure),
        }
    }
}
