//! TradeLog - terminal client for the TradeLog trading journal API.
//!
//! The heart of the crate is [`api::ApiClient`], an authenticated HTTP
//! client that renews an expired credential once for all concurrent callers.
//! The transport, session storage and navigation are traits
//! ([`traits`]) so the client can be driven by mocks in tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod cli_output;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod traits;
pub mod view;
