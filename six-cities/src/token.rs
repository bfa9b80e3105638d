//! Session token persistence.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Token store failure
#[derive(Error, Debug)]
pub enum TokenStoreError {
    /// Reading or writing the token file failed
    #[error("token file {path}: {source}")]
    Io {
        /// File that was accessed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Key-value storage for the session token
pub trait TokenStore: Send + Sync {
    /// Persist `token`, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the token cannot be written.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Current token, if any
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the store exists but cannot be read.
    fn read(&self) -> Result<Option<String>, TokenStoreError>;

    /// Forget the token
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the token cannot be removed.
    fn drop_token(&self) -> Result<(), TokenStoreError>;
}

/// Token store that lives as long as the process
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `token`
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn drop_token(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Token store backed by a single file
///
/// A missing file means no token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        std::fs::write(&self.path, token).map_err(|e| self.io_error(e))
    }

    fn read(&self) -> Result<Option<String>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn drop_token(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(self.io_error(e)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_round_trip() {
        let store = InMemoryTokenStore::new();
        assert!(matches!(store.read(), Ok(None)));

        assert!(store.save("T1").is_ok());
        assert_eq!(store.read().ok().flatten().as_deref(), Some("T1"));

        assert!(store.drop_token().is_ok());
        assert!(matches!(store.read(), Ok(None)));
    }

    #[test]
    fn file_store_persists_between_instances() {
        let path = std::env::temp_dir().join(format!(
            "six-cities-token-test-{}",
            std::process::id()
        ));
        let store = FileTokenStore::new(&path);
        assert!(store.drop_token().is_ok());
        assert!(matches!(store.read(), Ok(None)));

        assert!(store.save("T2\n").is_ok());
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.read().ok().flatten().as_deref(), Some("T2"));

        assert!(reopened.drop_token().is_ok());
        // Dropping twice is fine
        assert!(reopened.drop_token().is_ok());
        assert!(matches!(store.read(), Ok(None)));
    }
}
