//! Test doubles for the session ports
//!
//! [`ScriptedPerformer`] answers each URL from a queue of canned results
//! and records every request it receives, so tests can assert both what
//! was returned and exactly which calls were made.
//!
//! Enabled for this crate's unit tests and, through the `test-utils`
//! feature, for downstream test suites.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use riskscreen_domain::{HttpRequest, HttpResponse, RequestBody, TransportError};
use serde_json::Value;

use crate::ports::RequestPerformer;

type Scripted = Result<HttpResponse, TransportError>;

#[derive(Debug, Default)]
struct Script {
    queues: HashMap<String, VecDeque<Scripted>>,
    log: Vec<HttpRequest>,
}

/// Scripted [`RequestPerformer`]
///
/// Clones share the same script and request log. A URL with an exhausted
/// queue answers with [`TransportError::Connection`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedPerformer {
    script: Arc<Mutex<Script>>,
}

impl ScriptedPerformer {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a raw result for `url`
    pub fn push(&self, url: &str, result: Scripted) {
        self.lock().queues.entry(url.to_string()).or_default().push_back(result);
    }

    /// Queue a JSON response for `url`
    pub fn push_json(&self, url: &str, status: u16, body: Value) {
        self.push(url, Ok(HttpResponse::new(status, body.to_string())));
    }

    /// Queue a raw-body response for `url`
    pub fn push_body(&self, url: &str, status: u16, body: &str) {
        self.push(url, Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport error for `url`
    pub fn push_error(&self, url: &str, error: TransportError) {
        self.push(url, Err(error));
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().log.clone()
    }

    /// Requests received for `url`, in order
    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.lock().log.iter().filter(|r| r.url == url).cloned().collect()
    }

    /// Number of requests received for `url`
    pub fn count(&self, url: &str) -> usize {
        self.lock().log.iter().filter(|r| r.url == url).count()
    }

    /// Number of queued results not yet consumed, across all URLs
    pub fn pending(&self) -> usize {
        self.lock().queues.values().map(VecDeque::len).sum()
    }
}

#[async_trait]
impl RequestPerformer for ScriptedPerformer {
    async fn perform(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut script = self.lock();
        let next = script.queues.get_mut(&request.url).and_then(VecDeque::pop_front);
        let missing = format!("no scripted response for {} {}", request.method, request.url);
        script.log.push(request);
        next.unwrap_or(Err(TransportError::Connection(missing)))
    }
}

/// Read a named field from a form or JSON request body
pub fn body_field(request: &HttpRequest, name: &str) -> Option<String> {
    match request.body.as_ref()? {
        RequestBody::Form(fields) => {
            fields.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone())
        }
        RequestBody::Json(document) => document.get(name)?.as_str().map(str::to_string),
    }
}
