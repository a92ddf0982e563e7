//! Bearer token storage.
//!
//! The session logic only talks to [`CredentialHolder`]; where the token
//! actually lives is decided at start-up.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::Result;

/// Get/set/clear access to the current bearer token.
pub trait CredentialHolder: Send + Sync + std::fmt::Debug {
    /// The current token, if any.
    fn token(&self) -> Option<String>;

    /// Replace the stored token.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Forget the stored token. Never fails from the caller's view.
    fn clear(&self);

    /// Whether a token is present.
    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Keeps the token in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a known token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialHolder for MemoryCredentials {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set_token(&self, token: &str) -> Result<()> {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

/// Persists the token to a file so a restart can resume the session.
///
/// Reads go through an in-memory copy; the file is only touched on
/// set/clear.
#[derive(Debug)]
pub struct FileCredentials {
    path: PathBuf,
    cache: MemoryCredentials,
}

impl FileCredentials {
    /// Open the token file at `path`, loading a token if one is there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = MemoryCredentials::new();

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let token = content.trim();
                if !token.is_empty() {
                    let _ = cache.set_token(token);
                    tracing::debug!(path = %path.display(), "Loaded stored credential");
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read credential file"
                );
            }
        }

        Self { path, cache }
    }
}

impl CredentialHolder for FileCredentials {
    fn token(&self) -> Option<String> {
        self.cache.token()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.cache.set_token(token)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) {
        self.cache.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not remove credential file"
                );
            }
        }
    }
}
