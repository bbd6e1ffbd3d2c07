//! In-memory session store for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::auth::Session;
use crate::traits::{SessionStore, StoreError};

/// In-memory [`SessionStore`] for testing.
///
/// Clones share the same storage, so a test can keep a handle and inspect
/// what the client wrote.
///
/// # Example
///
/// ```ignore
/// use tradelog::adapters::mock::InMemorySessionStore;
/// use tradelog::auth::Session;
/// use tradelog::traits::SessionStore;
///
/// let store = InMemorySessionStore::new();
/// assert!(store.load().await?.is_none());
///
/// store.save(&Session::new()).await?;
/// assert!(store.get_session().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    session: Arc<Mutex<Option<Session>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
    clear_should_fail: Arc<Mutex<bool>>,
    saves: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `session`.
    pub fn with_session(session: Session) -> Self {
        let store = Self::new();
        store.set_session(Some(session));
        store
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *lock(&self.save_should_fail) = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *lock(&self.load_should_fail) = should_fail;
    }

    /// Configure whether clear should fail.
    pub fn set_clear_should_fail(&self, should_fail: bool) {
        *lock(&self.clear_should_fail) = should_fail;
    }

    /// Get the current session synchronously.
    pub fn get_session(&self) -> Option<Session> {
        lock(&self.session).clone()
    }

    /// Set the session synchronously.
    pub fn set_session(&self, session: Option<Session>) {
        *lock(&self.session) = session;
    }

    /// Bearer credential currently stored.
    pub fn access_token(&self) -> Option<String> {
        lock(&self.session)
            .as_ref()
            .and_then(|session| session.access_token.clone())
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        if *lock(&self.load_should_fail) {
            return Err(StoreError::LoadFailed("Mock load failure".to_string()));
        }
        Ok(self.get_session())
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        if *lock(&self.save_should_fail) {
            return Err(StoreError::SaveFailed("Mock save failure".to_string()));
        }
        self.set_session(Some(session.clone()));
        *lock(&self.saves) += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        if *lock(&self.clear_should_fail) {
            return Err(StoreError::ClearFailed("Mock clear failure".to_string()));
        }
        self.set_session(None);
        Ok(())
    }
}
