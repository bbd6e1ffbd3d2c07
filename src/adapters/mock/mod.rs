//! Mock implementations for testing.
//!
//! These let the API client run without network or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses and gates
//! - [`InMemorySessionStore`] - In-memory session storage
//! - [`RecordingNavigator`] - Navigator that records transitions

pub mod http;
pub mod navigator;
pub mod session_store;

pub use http::{MockGate, MockHandler, MockHttpClient, MockResponse, RecordedRequest};
pub use navigator::RecordingNavigator;
pub use session_store::InMemorySessionStore;
