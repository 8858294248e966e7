//! Session persistence — an injectable store seam with in-memory and
//! file-backed implementations.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::session::Session;

/// Backend-agnostic session store.
///
/// There is at most one writer per discrete user action (login, signup,
/// logout), so the discipline is last-write-wins; no locking beyond what
/// each implementation needs internally.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the persisted session. Returns `None` if nothing is stored or
    /// the stored data fails to parse; never fails.
    async fn get(&self) -> Option<Session>;

    /// Persist the session, replacing any existing one.
    async fn set(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove the persisted session. Idempotent; failures are logged,
    /// not surfaced.
    async fn clear(&self);
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Option<Session> {
        self.slot.read().await.clone()
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

/// File-backed store holding one JSON-serialized `Session`.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Option<Session> {
        let bytes = tokio::fs::read(&self.path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring unparsable session file: {e}");
                None
            }
        }
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove session file: {e}"),
        }
    }
}
