//! Client configuration.
//!
//! Defaults can be overridden from the environment:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `TRADELOG_API_URL` | Base endpoint of the backend | `http://localhost:8080/api/v1` |
//! | `TRADELOG_HOME` | Directory holding `session.json` | `~/.tradelog` |
//! | `TRADELOG_TIMEOUT_SECS` | Per-request transport timeout | none |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::adapters::{FileSessionStore, ReqwestHttpClient};
use crate::api::ApiClient;
use crate::traits::{HttpError, Navigator, StoreError};

/// Default base endpoint of the backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

pub const API_URL_ENV: &str = "TRADELOG_API_URL";
pub const HOME_ENV: &str = "TRADELOG_HOME";
pub const TIMEOUT_ENV: &str = "TRADELOG_TIMEOUT_SECS";

/// Errors while assembling a client from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{TIMEOUT_ENV} must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] HttpError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Settings for building an [`ApiClient`].
///
/// # Example
///
/// ```ignore
/// use tradelog::config::ClientConfig;
///
/// let config = ClientConfig::from_env()?.with_api_url("http://staging:8080/api/v1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base endpoint, without trailing slash.
    pub api_url: String,
    /// Directory of the session file; `None` means `~/.tradelog`.
    pub home: Option<PathBuf>,
    /// Transport timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            home: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the directory holding the session file.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Set the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Defaults overridden by `TRADELOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = non_empty_var(API_URL_ENV) {
            config = config.with_api_url(url);
        }
        if let Some(home) = non_empty_var(HOME_ENV) {
            config = config.with_home(home);
        }
        if let Some(raw) = non_empty_var(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Session store for this configuration.
    pub fn session_store(&self) -> Result<FileSessionStore, ConfigError> {
        match &self.home {
            Some(home) => Ok(FileSessionStore::from_dir(home)),
            None => Ok(FileSessionStore::new()?),
        }
    }

    /// Transport for this configuration.
    pub fn http_client(&self) -> Result<ReqwestHttpClient, ConfigError> {
        match self.timeout {
            Some(timeout) => Ok(ReqwestHttpClient::with_timeout(timeout)?),
            None => Ok(ReqwestHttpClient::new()),
        }
    }

    /// Assemble a client talking to the real backend through `navigator`.
    pub fn build_client(&self, navigator: Arc<dyn Navigator>) -> Result<ApiClient, ConfigError> {
        Ok(ApiClient::new(
            self.api_url.clone(),
            Arc::new(self.http_client()?),
            Arc::new(self.session_store()?),
            navigator,
        ))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
