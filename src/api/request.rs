//! Description of a call before it is sent.

use std::fmt;

use serde::Serialize;

use crate::error::ApiResult;

/// HTTP methods the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call to the backend, relative to the base endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base endpoint, starting with `/`.
    pub path: String,
    /// JSON body for POST calls.
    pub body: Option<String>,
    /// Set once the call has been reissued after a 401.
    pub retried: bool,
    /// Whether a 401 may be recovered by refreshing the credential.
    pub refreshable: bool,
}

impl ApiRequest {
    /// Authenticated GET.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            retried: false,
            refreshable: true,
        }
    }

    /// Authenticated POST with a JSON body.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> ApiResult<Self> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(serde_json::to_string(body)?),
            retried: false,
            refreshable: true,
        })
    }

    /// Authenticated POST without a body.
    pub fn empty_post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    /// Mark the call as a public auth endpoint: a 401 is final.
    pub fn public(mut self) -> Self {
        self.refreshable = false;
        self
    }

    /// Whether a 401 on this call should enter the refresh flow.
    pub fn can_retry(&self) -> bool {
        self.refreshable && !self.retried
    }
}
