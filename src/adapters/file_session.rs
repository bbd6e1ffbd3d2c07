//! File-backed session store.
//!
//! The session lives in a single pretty-printed JSON file, by default
//! `~/.tradelog/session.json`. Saves write a temporary sibling file and
//! rename it over the session file, so a concurrent load sees either the
//! old or the new session, never a partial one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::auth::Session;
use crate::traits::{SessionStore, StoreError};

const SESSION_DIR: &str = ".tradelog";
const SESSION_FILE: &str = "session.json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// [`SessionStore`] persisting to a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at `~/.tradelog/session.json`.
    pub fn new() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or_else(|| {
            StoreError::Unavailable("Failed to determine home directory".to_string())
        })?;
        Ok(Self::from_dir(home.join(SESSION_DIR)))
    }

    /// Store at `session.json` inside `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::at(dir.as_ref().join(SESSION_FILE))
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unique temporary path next to the session file.
    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}.{}.tmp", std::process::id(), n));
        PathBuf::from(name)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::LoadFailed(e.to_string())),
        };

        serde_json::from_slice(&contents).map(Some).map_err(|e| {
            tracing::warn!(path = %self.path.display(), "Unreadable session file: {}", e);
            StoreError::Serialization(e.to_string())
        })
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::SaveFailed(e.to_string()))?;
        }

        let contents = serde_json::to_vec_pretty(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let temp_path = self.temp_path();
        if let Err(e) = write_file(&temp_path, &contents).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::SaveFailed(e.to_string()));
        }
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::SaveFailed(e.to_string()));
        }

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::ClearFailed(e.to_string())),
        }
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}
