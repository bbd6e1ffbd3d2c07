//! Persisted session record.
//!
//! A [`Session`] bundles the bearer credential, the server-held session
//! reference (the `refresh_token` cookie) and the authentication-state record
//! shown by the client.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

/// Name of the cookie carrying the server-held session reference.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Authentication state exposed to views.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
}

impl AuthState {
    /// State of a signed-in user.
    pub fn signed_in(user: User) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }

    /// Whether the signed-in user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.role.is_admin())
    }
}

/// Everything the client keeps between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Bearer credential attached to every request.
    pub access_token: Option<String>,
    /// Server-held session reference used to renew the credential.
    pub refresh_cookie: Option<String>,
    /// Who is signed in.
    #[serde(default)]
    pub auth: AuthState,
    /// Last write as Unix timestamp (seconds since epoch).
    pub updated_at: Option<i64>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session right after a successful login.
    pub fn signed_in(access_token: String, refresh_cookie: Option<String>, user: User) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_cookie,
            auth: AuthState::signed_in(user),
            updated_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// Check if the session has a bearer credential.
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Replace the bearer credential, keeping the rest of the record.
    pub fn rotate_token(&mut self, access_token: String) {
        self.access_token = Some(access_token);
        self.updated_at = Some(chrono::Utc::now().timestamp());
    }

    /// `Cookie` header value for the stored session reference, if any.
    pub fn cookie_header(&self) -> Option<String> {
        self.refresh_cookie
            .as_ref()
            .map(|value| format!("{}={}", REFRESH_COOKIE, value))
    }
}

/// Extract the session reference from a `Set-Cookie` header.
///
/// Returns `None` if the header sets a different cookie, and `Some(None)` if
/// it clears the session cookie (empty value).
pub fn parse_refresh_cookie(set_cookie: &str) -> Option<Option<String>> {
    set_cookie.split(',').find_map(|cookie| {
        let pair = cookie.trim().split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        if name.trim() != REFRESH_COOKIE {
            return None;
        }
        let value = value.trim().trim_matches('"');
        Some((!value.is_empty()).then(|| value.to_string()))
    })
}

/// Claims the backend puts in its access tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    pub sub: u64,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Read the claims of a JWT access token without verifying its signature.
///
/// Returns `None` if the token is not a decodable JWT.
pub fn peek_claims(access_token: &str) -> Option<TokenClaims> {
    let payload = access_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}
