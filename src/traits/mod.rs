//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport (GET, POST)
//! - [`SessionStore`] - Persisted session (credential + auth state)
//! - [`Navigator`] - View transitions requested by the client

pub mod http;
pub mod navigator;
pub mod session_store;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use navigator::Navigator;
pub use session_store::{SessionStore, StoreError};
