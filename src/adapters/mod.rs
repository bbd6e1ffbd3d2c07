//! Concrete implementations of the traits in `crate::traits`.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`FileSessionStore`] - JSON file session storage
//! - [`WatchNavigator`] - Current view on a watch channel
//!
//! Test doubles live in [`mock`].

pub mod file_session;
pub mod mock;
pub mod reqwest_http;
pub mod watch_navigator;

pub use file_session::FileSessionStore;
pub use mock::{InMemorySessionStore, MockHttpClient, RecordingNavigator};
pub use reqwest_http::ReqwestHttpClient;
pub use watch_navigator::WatchNavigator;
