//! Conversions from reqwest errors into transport and domain errors.

use std::error::Error as StdError;

use reqwest::Error as HttpError;
use riskscreen_domain::{ScreeningError, TransportError};

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

/// Classify a failed call
///
/// Timeouts stay distinct; connect, DNS, request-build and body-read
/// failures all become [`TransportError::Connection`].
pub fn transport_error(err: HttpError) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }

    TransportError::Connection(describe(&err))
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ScreeningError */
/* -------------------------------------------------------------------------- */

/// Map a client construction failure
pub fn build_error(err: HttpError) -> ScreeningError {
    ScreeningError::Config(format!("failed to build HTTP client: {}", describe(&err)))
}

/// Error message followed by its source chain
///
/// reqwest's own message rarely names the root cause ("error sending
/// request"), so the chain is appended.
fn describe(err: &HttpError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
