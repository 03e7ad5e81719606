//! Durable token storage
//!
//! The session persists exactly one opaque token so a restarted client can
//! resume without logging in again. [`FileTokenStore`] keeps it in a single
//! file; [`MemoryTokenStore`] is the non-durable stand-in used by tests.
//!
//! Both implementations treat "no token" as a normal state, and clearing an
//! already-empty store succeeds.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Name of the single storage key
pub const TOKEN_KEY: &str = "token";

/// Token storage errors
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the backing file failed
    #[error("Token storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// In-memory store lock was poisoned by a panicking writer
    #[error("Token storage lock poisoned")]
    Poisoned,
}

/// Token storage result type alias
pub type TokenStoreResult<T> = Result<T, TokenStoreError>;

/// Durable single-key token storage
pub trait TokenStore: Send + Sync {
    /// Returns the persisted token, `None` when logged out
    fn load(&self) -> TokenStoreResult<Option<String>>;

    /// Persists the token, replacing any previous one
    fn save(&self, token: &str) -> TokenStoreResult<()>;

    /// Removes the persisted token. Succeeds when nothing is stored.
    fn clear(&self) -> TokenStoreResult<()>;
}

/// Token stored as the sole content of a file
///
/// Parent directories are created on first save. Surrounding whitespace is
/// ignored on load and an empty file counts as "no token".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by `path` (the file need not exist)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> TokenStoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, token: &str) -> TokenStoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        fs::write(&self.path, token).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "Persisted session token");
        Ok(())
    }

    fn clear(&self) -> TokenStoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed session token");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Non-durable token storage
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`, as after a previous run
    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryTokenStore {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> TokenStoreResult<Option<String>> {
        let guard = self.token.lock().map_err(|_| TokenStoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> TokenStoreResult<()> {
        let mut guard = self.token.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> TokenStoreResult<()> {
        let mut guard = self.token.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}
