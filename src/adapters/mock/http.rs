//! Mock HTTP client for testing.
//!
//! Responses are configured per URL: a fixed reply, a FIFO sequence, or a
//! handler computing the reply from the request. A URL can also be held
//! behind a [`MockGate`] so tests decide when its responses are delivered.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Look up a request header, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Bearer credential carried by the request, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.header("Authorization")?.strip_prefix("Bearer ")
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// JSON response with the given status.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_body(status, &value))
    }

    /// JSON response that also sets a header.
    pub fn json_with_header(status: u16, value: serde_json::Value, name: &str, header: &str) -> Self {
        let mut response = Response::json_body(status, &value);
        response.headers.insert(name.to_string(), header.to_string());
        MockResponse::Success(response)
    }
}

/// Computes a response from the incoming request.
pub type MockHandler = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

#[derive(Clone)]
enum Rule {
    Fixed(MockResponse),
    /// Served in order; the last one repeats.
    Sequence(VecDeque<MockResponse>),
    Handler(MockHandler),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Fixed(response) => f.debug_tuple("Fixed").field(response).finish(),
            Rule::Sequence(responses) => f.debug_tuple("Sequence").field(responses).finish(),
            Rule::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// Holds back responses for one URL until released or dropped.
#[derive(Debug)]
pub struct MockGate {
    tx: watch::Sender<bool>,
}

impl MockGate {
    /// Let held and future requests through.
    pub fn release(&self) {
        let _ = self.tx.send(true);
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use tradelog::adapters::mock::{MockHttpClient, MockResponse};
/// use tradelog::traits::{Headers, HttpClient};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://api.test/trades",
///     MockResponse::json(200, serde_json::json!({"data": []})),
/// );
///
/// let response = client.get("http://api.test/trades", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.count("GET", "http://api.test/trades"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured rules by URL (exact, then longest prefix)
    rules: Arc<Mutex<HashMap<String, Rule>>>,
    /// Used when no rule matches
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Gates holding back responses by exact URL
    gates: Arc<Mutex<HashMap<String, watch::Receiver<bool>>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `url` with `response`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.rules).insert(url.to_string(), Rule::Fixed(response));
    }

    /// Answer `url` with `responses` in order, repeating the last one.
    pub fn set_sequence(&self, url: &str, responses: Vec<MockResponse>) {
        lock(&self.rules).insert(url.to_string(), Rule::Sequence(responses.into()));
    }

    /// Compute the answer for `url` from each request.
    pub fn set_handler<F>(&self, url: &str, handler: F)
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        lock(&self.rules).insert(url.to_string(), Rule::Handler(Arc::new(handler)));
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Hold every response for `url` until the returned gate is released or
    /// dropped.
    pub fn hold(&self, url: &str) -> MockGate {
        let (tx, rx) = watch::channel(false);
        lock(&self.gates).insert(url.to_string(), rx);
        MockGate { tx }
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Recorded requests for `method` and `url`.
    pub fn requests_to(&self, method: &str, url: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    /// Number of requests made with `method` to `url`.
    pub fn count(&self, method: &str, url: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) -> RecordedRequest {
        let request = RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        };
        lock(&self.requests).push(request.clone());
        request
    }

    async fn wait_for_gate(&self, url: &str) {
        let gate = lock(&self.gates).get(url).cloned();
        if let Some(mut rx) = gate {
            // A dropped gate also lets the request through.
            let _ = rx.wait_for(|open| *open).await;
        }
    }

    fn resolve(&self, request: &RecordedRequest) -> Option<MockResponse> {
        let handler = {
            let mut rules = lock(&self.rules);
            let key = if rules.contains_key(&request.url) {
                Some(request.url.clone())
            } else {
                rules
                    .keys()
                    .filter(|pattern| request.url.starts_with(pattern.as_str()))
                    .max_by_key(|pattern| pattern.len())
                    .cloned()
            };

            let rule = match key {
                Some(key) => rules.get_mut(&key),
                None => None,
            };
            match rule {
                Some(Rule::Fixed(response)) => return Some(response.clone()),
                Some(Rule::Sequence(responses)) => {
                    return if responses.len() > 1 {
                        responses.pop_front()
                    } else {
                        responses.front().cloned()
                    };
                }
                Some(Rule::Handler(handler)) => Some(handler.clone()),
                None => None,
            }
        };

        // Handlers run outside the lock so they can inspect the mock.
        match handler {
            Some(handler) => Some(handler(request)),
            None => lock(&self.default_response).clone(),
        }
    }

    async fn respond(&self, request: RecordedRequest) -> Result<Response, HttpError> {
        self.wait_for_gate(&request.url).await;

        match self.resolve(&request) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let request = self.record_request("GET", url, headers, None);
        self.respond(request).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        let request = self.record_request("POST", url, headers, Some(body.to_string()));
        self.respond(request).await
    }
}
