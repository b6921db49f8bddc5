//! One logical API operation

use riskscreen_domain::HttpMethod;
use serde_json::Value;

/// Method, URL, optional JSON body and header overrides
///
/// Endpoint-specific operations are expressed purely as values of this
/// type and handed to [`RequestExecutor::execute`](super::RequestExecutor::execute).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// JSON body, if any
    pub body: Option<Value>,
    /// Header overrides, applied over the executor's defaults
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request without body or header overrides
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), body: None, headers: Vec::new() }
    }

    /// GET `url`
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// POST `body` to `url`
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, url).with_body(body)
    }

    /// PUT `body` to `url`
    pub fn put(url: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, url).with_body(body)
    }

    /// PATCH `url` with `body`
    pub fn patch(url: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, url).with_body(body)
    }

    /// DELETE `url`
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override a header
    ///
    /// A later override of the same name (ignoring ASCII case) wins.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Override the `Content-Type` header, e.g. for bulk-update media types
    #[must_use]
    pub fn with_content_type(self, media_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", media_type)
    }
}
