//! Request and response bodies exchanged with the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{TradeSide, User};

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/promote`.
#[derive(Debug, Clone, Serialize)]
pub struct PromoteBody<'a> {
    pub secret: &'a str,
}

/// Body of `POST /trades`.
#[derive(Debug, Clone, Serialize)]
pub struct TradeBody<'a> {
    pub symbol: &'a str,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub price: Decimal,
    pub quantity: Decimal,
}

/// Response of the login and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Present on login for backends that return the account inline.
    #[serde(default)]
    pub user: Option<User>,
}

/// `{"data": ...}` envelope used by the read endpoints.
///
/// A `null` payload decodes as the default (an empty list).
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,
}

impl<T: Default> DataEnvelope<T> {
    pub fn into_inner(self) -> T {
        self.data.unwrap_or_default()
    }
}

/// `{"message": "..."}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// `{"error": "..."}` body carried by every failure response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
