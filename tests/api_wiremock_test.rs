//! End-to-end tests through the real reqwest transport and session file,
//! against a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tradelog::adapters::mock::RecordingNavigator;
use tradelog::adapters::{FileSessionStore, ReqwestHttpClient};
use tradelog::api::ApiClient;
use tradelog::auth::Session;
use tradelog::error::ApiError;
use tradelog::forms::LoginForm;
use tradelog::models::{Role, User};
use tradelog::traits::SessionStore;
use tradelog::view::View;

struct Backend {
    server: MockServer,
    store: FileSessionStore,
    navigator: RecordingNavigator,
    client: ApiClient,
    _dir: TempDir,
}

async fn backend() -> Backend {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::from_dir(dir.path());
    let navigator = RecordingNavigator::new();
    let client = ApiClient::new(
        format!("{}/api/v1", server.uri()),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(store.clone()),
        Arc::new(navigator.clone()),
    );
    Backend {
        server,
        store,
        navigator,
        client,
        _dir: dir,
    }
}

async fn store_session(store: &FileSessionStore, token: &str) {
    let session = Session::signed_in(
        token.to_string(),
        Some("ref-1".to_string()),
        User::new(7, "trader@example.com", Role::User),
    );
    store.save(&session).await.unwrap();
}

fn trades_json() -> serde_json::Value {
    json!({
        "data": [{
            "id": 1,
            "user_id": 7,
            "symbol": "ETH/USD",
            "type": "SELL",
            "price": "2500.00",
            "quantity": "1.5",
            "executed_at": "2024-05-02T09:15:00Z"
        }]
    })
}

async fn mount_trades(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/trades"))
        .and(header("Authorization", "Bearer t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(trades_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/trades"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "token expired"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_stores_cookie_in_session_file() {
    let backend = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"email": "trader@example.com", "password": "hunter22"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "refresh_token=ref-1; HttpOnly; Path=/")
                .set_body_json(json!({
                    "access_token": "t1",
                    "user": {"id": 7, "email": "trader@example.com", "role": "user"}
                })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    backend
        .client
        .login(&LoginForm {
            email: "trader@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();

    let stored = backend.store.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("t1"));
    assert_eq!(stored.refresh_cookie.as_deref(), Some("ref-1"));
    assert!(stored.auth.is_authenticated);
    assert_eq!(backend.navigator.last(), Some(View::Dashboard));
}

#[tokio::test]
async fn test_expired_token_refreshed_with_cookie() {
    let backend = backend().await;
    store_session(&backend.store, "t1").await;
    mount_trades(&backend.server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(header("Cookie", "refresh_token=ref-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "refresh_token=ref-2; HttpOnly; Path=/")
                .set_body_json(json!({"access_token": "t2"})),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let trades = backend.client.trades().await.unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].symbol, "ETH/USD");

    let stored = backend.store.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("t2"));
    assert_eq!(stored.refresh_cookie.as_deref(), Some("ref-2"));
    assert!(stored.auth.is_authenticated);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_refresh_once() {
    let backend = backend().await;
    store_session(&backend.store, "t1").await;
    mount_trades(&backend.server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "t2"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let calls = (0..4).map(|_| {
        let client = backend.client.clone();
        tokio::spawn(async move { client.trades().await })
    });
    for result in join_all(calls).await {
        assert_eq!(result.unwrap().unwrap().len(), 1);
    }

    // A late 401 may replay with the rotated token; the refresh endpoint
    // itself must still be hit once, which `expect(1)` checks on drop.
    let stored = backend.store.load().await.unwrap().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("t2"));
}

#[tokio::test]
async fn test_refresh_rejected_removes_session_file() {
    let backend = backend().await;
    store_session(&backend.store, "t1").await;
    mount_trades(&backend.server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid refresh token"})),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let err = backend.client.trades().await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired(_)));
    assert!(!backend.store.path().exists());
    assert_eq!(backend.navigator.visited(), vec![View::Login]);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let dir = TempDir::new().unwrap();
    let client = ApiClient::new(
        "http://127.0.0.1:59999/api/v1",
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(FileSessionStore::from_dir(dir.path())),
        Arc::new(RecordingNavigator::new()),
    );

    let err = client.portfolio().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.is_retryable());
}
