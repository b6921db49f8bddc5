//! Transport-level request and response values
//!
//! These are what cross the `RequestPerformer` port. They carry no
//! behavior beyond small accessors so any HTTP stack can produce and
//! consume them.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::impl_wire_name_conversions;

/// HTTP method used by API operations and token exchanges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Patch => "PATCH",
    Delete => "DELETE",
});

/// Request body, encoded by the transport
#[derive(Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document; the `Content-Type` header is set by the caller
    Json(Value),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
}

impl fmt::Debug for RequestBody {
    // Bodies may hold passwords or tokens.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(_) => f.write_str("Json(..)"),
            Self::Form(fields) => {
                let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
                write!(f, "Form({names:?})")
            }
        }
    }
}

/// One HTTP call handed to the transport
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// Header name/value pairs, sent in order
    pub headers: Vec<(String, String)>,
    /// Optional body
    pub body: Option<RequestBody>,
    /// Deadline for the whole call
    pub timeout: Duration,
}

impl HttpRequest {
    /// Create a request without headers or body
    pub fn new(method: HttpMethod, url: impl Into<String>, timeout: Duration) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None, timeout }
    }

    /// Append a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attach a form body
    #[must_use]
    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// First header value matching `name`, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Response returned by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response without headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body is empty or whitespace only
    pub fn is_body_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Failure raised by the transport before a response was received
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The call exceeded its deadline
    #[error("request timed out")]
    Timeout,

    /// DNS, socket, TLS or refused-connection failure
    #[error("connection failed: {0}")]
    Connection(String),
}
