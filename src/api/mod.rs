//! Client for the TradeLog REST API.
//!
//! - [`ApiClient`] - authenticated transport with single-flight refresh
//! - [`ApiRequest`] - one call before it is sent
//! - Endpoint operations (`login`, `dashboard`, `admin_ledger`, ...) are
//!   methods on [`ApiClient`]

mod client;
mod endpoints;
mod request;

pub use client::ApiClient;
pub use request::{ApiRequest, Method};
