//! Session storage trait abstraction.
//!
//! The bearer credential, the server-held session reference and the
//! authentication-state record are persisted together as a [`Session`].

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Session;

/// Session storage errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Failed to read the stored session
    #[error("Failed to load session: {0}")]
    LoadFailed(String),
    /// Failed to write the session
    #[error("Failed to save session: {0}")]
    SaveFailed(String),
    /// Failed to delete the stored session
    #[error("Failed to clear session: {0}")]
    ClearFailed(String),
    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Storage location could not be determined
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
}

/// Trait for persisting the client session across runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the stored session.
    ///
    /// # Returns
    /// - `Ok(Some(session))` if a session is stored
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if the store could not be read
    async fn load(&self) -> Result<Option<Session>, StoreError>;

    /// Replace the stored session.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Delete the stored session. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), StoreError>;
}
