use std::sync::{Arc, Once};
use std::time::Duration;

use riskscreen_infra::{HttpClient, ScreeningConfig, ScreeningSession};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth2/v1/token";

/// Install a test-writer subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn config(server: &MockServer, timeout: Duration) -> ScreeningConfig {
    ScreeningConfig::new(
        format!("{}{TOKEN_PATH}", server.uri()),
        format!("{}/api/v1", server.uri()),
        "client-1",
        "svc-user",
        "hunter2",
        "device-1",
    )
    .with_timeout(timeout)
}

/// Session over a proxy-free client so local mock servers are reachable.
pub fn session(server: &MockServer, timeout: Duration) -> ScreeningSession {
    init_tracing();
    let client = HttpClient::builder().no_proxy().timeout(timeout).build().expect("http client");
    ScreeningSession::with_performer(config(server, timeout), Arc::new(client))
        .expect("valid config")
}

pub fn identity_exchange() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
}

pub fn access_exchange() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("assertion="))
}

pub fn refresh_exchange() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_partial_json(json!({"grant_type": "refresh_token"})))
}

pub fn identity_grant() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"id_token": "A", "refresh_token": "R"}))
}

pub fn access_grant(access_token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"access_token": access_token, "expires_in": expires_in}))
}
