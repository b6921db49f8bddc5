use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method};
use riskscreen_core::RequestPerformer;
use riskscreen_domain::constants::DEFAULT_TIMEOUT_SECS;
use riskscreen_domain::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Result, TransportError};
use tracing::debug;

use crate::errors::{build_error, transport_error};

/// reqwest-backed transport.
///
/// Makes exactly one attempt per call; retry policy belongs to the
/// executor. Each request's own timeout overrides the client default.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }
}

#[async_trait]
impl RequestPerformer for HttpClient {
    async fn perform(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let HttpRequest { method, url, headers, body, timeout } = request;

        let mut builder = self.client.request(reqwest_method(method), &url).timeout(timeout);
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }
        builder = match body {
            Some(RequestBody::Json(document)) => builder.body(document.to_string()),
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        debug!(%method, %url, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            transport_error(err)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        debug!(%method, %url, status, "received HTTP response");

        Ok(HttpResponse { status, headers, body })
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    no_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
            no_proxy: false,
        }
    }
}

impl HttpClientBuilder {
    /// Default timeout for requests that do not carry their own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` sent on every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent on every request unless the request sets its own.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Ignore proxy environment variables.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// `ScreeningError::Config` if reqwest cannot build the client, e.g.
    /// when the TLS backend fails to initialise.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        if self.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(build_error)?;

        Ok(HttpClient { client })
    }
}
