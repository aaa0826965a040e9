//! Access and refresh token storage.
//!
//! Only the authenticated client writes here: on login, on a successful
//! refresh, and when a session expires or the user logs out.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Access/refresh token pair. Both values are opaque.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Longer-lived token exchanged for a new pair.
    pub refresh_token: String,
}

impl Credentials {
    /// Create a token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Storage for the current credentials.
pub trait TokenStore: Send + Sync {
    /// Current access token.
    fn access_token(&self) -> Option<String>;

    /// Current refresh token.
    fn refresh_token(&self) -> Option<String>;

    /// Replace both tokens.
    fn set_tokens(&self, credentials: Credentials);

    /// Forget both tokens.
    fn clear(&self);
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credentials: RwLock<Option<Credentials>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: RwLock::new(Some(credentials)),
        }
    }

    /// Create a store holding only an access token.
    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self::with_credentials(Credentials::new(access_token, ""))
    }

    /// Snapshot of the stored credentials.
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.credentials
            .read()
            .as_ref()
            .map(|c| c.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.credentials
            .read()
            .as_ref()
            .map(|c| c.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    fn set_tokens(&self, credentials: Credentials) {
        *self.credentials.write() = Some(credentials);
    }

    fn clear(&self) {
        *self.credentials.write() = None;
    }
}

/// Error opening a [`FileTokenStore`].
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not hold credentials.
    #[error("Invalid token file: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Token storage persisted as a JSON file, so a session survives restarts.
///
/// Reads are served from memory. Write failures are logged and the in-memory
/// value is kept, matching the infallible [`TokenStore`] contract.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    memory: MemoryTokenStore,
}

impl FileTokenStore {
    /// Open the store, loading credentials if the file exists.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenStoreError> {
        let path = path.into();
        let memory = match std::fs::read(&path) {
            Ok(bytes) => MemoryTokenStore::with_credentials(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryTokenStore::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, memory })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, credentials: &Credentials) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(credentials)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.memory.access_token()
    }

    fn refresh_token(&self) -> Option<String> {
        self.memory.refresh_token()
    }

    fn set_tokens(&self, credentials: Credentials) {
        if let Err(e) = self.persist(&credentials) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist tokens");
        }
        self.memory.set_tokens(credentials);
    }

    fn clear(&self) {
        self.memory.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove token file");
            }
        }
    }
}
