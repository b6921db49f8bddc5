//! Turning raw HTTP responses into [`RequestOutcome`]s
//!
//! Shared by the token exchanges and the request executor so both read
//! server error codes the same way.

use riskscreen_domain::{Failure, HttpResponse, RequestOutcome};
use serde_json::{Map, Value};

/// Classify a received response
///
/// - success with a blank body: empty JSON object
/// - success with a JSON body: the parsed document
/// - success with anything else: [`Failure::parse`]
/// - non-success: [`Failure::from_status`] with the body's `"error"` code
pub fn classify_response(response: &HttpResponse) -> RequestOutcome {
    if !response.is_success() {
        return Err(Failure::from_status(response.status, server_error_code(&response.body)));
    }

    if response.is_body_blank() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(&response.body)
        .map_err(|e| Failure::parse(format!("invalid JSON response body: {e}")))
}

/// Extract the `"error"` member of a JSON error body
///
/// String codes are returned verbatim; structured codes are returned as
/// their JSON text. Bodies that are not JSON objects have no code.
pub fn server_error_code(body: &[u8]) -> Option<String> {
    let document: Value = serde_json::from_slice(body).ok()?;
    match document.get("error")? {
        Value::Null => None,
        Value::String(code) => Some(code.clone()),
        other => Some(other.to_string()),
    }
}
