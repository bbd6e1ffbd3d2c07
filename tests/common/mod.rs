//! Shared fixtures for the integration tests.
//!
//! [`Harness`] wires an [`ApiClient`] to the in-crate mocks so each test can
//! script responses and inspect what the client sent, stored and navigated to.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};

use tradelog::adapters::mock::{InMemorySessionStore, MockHttpClient, RecordingNavigator};
use tradelog::api::ApiClient;
use tradelog::auth::Session;

pub const BASE: &str = "http://api.test/api/v1";

/// Client plus handles on every mock it talks to.
pub struct Harness {
    pub http: MockHttpClient,
    pub store: InMemorySessionStore,
    pub navigator: RecordingNavigator,
    pub client: ApiClient,
}

impl Harness {
    /// Client without a stored session.
    pub fn new() -> Self {
        Self::with_store(InMemorySessionStore::new())
    }

    /// Client whose stored session holds `token` and the `ref-1` cookie.
    pub fn signed_in(token: &str) -> Self {
        Self::with_store(InMemorySessionStore::with_session(session_with(token)))
    }

    fn with_store(store: InMemorySessionStore) -> Self {
        let http = MockHttpClient::new();
        let navigator = RecordingNavigator::new();
        let client = ApiClient::new(
            BASE,
            Arc::new(http.clone()),
            Arc::new(store.clone()),
            Arc::new(navigator.clone()),
        );
        Self {
            http,
            store,
            navigator,
            client,
        }
    }
}

/// Absolute mock URL of `path`.
pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

/// Session with an access token and the `ref-1` refresh cookie.
pub fn session_with(token: &str) -> Session {
    let mut session = Session::new();
    session.rotate_token(token.to_string());
    session.refresh_cookie = Some("ref-1".to_string());
    session
}

/// Unsigned JWT carrying `sub` and `role` claims.
pub fn jwt(sub: u64, role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": sub, "role": role, "exp": 4102444800i64}).to_string());
    format!("{}.{}.sig", header, payload)
}

/// `{"data": [...]}` with one BTC trade, decimals as strings.
pub fn trades_body() -> Value {
    json!({
        "data": [{
            "id": 1,
            "user_id": 7,
            "symbol": "BTC/USD",
            "type": "BUY",
            "price": "42000.50",
            "quantity": "0.25",
            "executed_at": "2024-03-01T14:30:00Z"
        }]
    })
}

/// `{"data": [...]}` with one BTC holding.
pub fn portfolio_body() -> Value {
    json!({
        "data": [{"symbol": "BTC/USD", "quantity": "0.25", "value": "10500.125"}]
    })
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
