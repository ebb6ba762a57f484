// Persisted session state.
//
// The bearer token is the only process-wide mutable state in the client.
// Readers (the request pipeline, the navigation guard) go through
// `SessionStore::token()` on every use; only the login/logout flow writes.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

/// Storage key under which the token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Access to the persisted auth token.
pub trait SessionStore: Send + Sync {
    /// The current token, or `None` when logged out.
    fn token(&self) -> Option<SecretString>;

    /// Store a token after a successful login.
    fn set_token(&self, token: SecretString) -> Result<(), Error>;

    /// Forget the token on logout.
    fn clear_token(&self) -> Result<(), Error>;

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Empty or whitespace-only tokens count as absent.
fn non_empty(token: SecretString) -> Option<SecretString> {
    if token.expose_secret().trim().is_empty() {
        None
    } else {
        Some(token)
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<SecretString>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token: String = token.into();
        Self {
            token: RwLock::new(non_empty(SecretString::from(token))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: SecretString) -> Result<(), Error> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = non_empty(token);
        Ok(())
    }

    fn clear_token(&self) -> Result<(), Error> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ── File-backed store ───────────────────────────────────────────────

/// On-disk shape: a single `token` key.
#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Durable session store backed by a small JSON file.
///
/// The file is re-read on every [`token()`](SessionStore::token) call, so a
/// login or logout from another process is observed immediately.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<SecretString> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable session file");
                return None;
            }
        };

        match serde_json::from_str::<SessionFile>(&raw) {
            Ok(file) => non_empty(SecretString::from(file.token)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed session file");
                None
            }
        }
    }

    fn set_token(&self, token: SecretString) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Session {
                message: format!("failed to create {}: {e}", parent.display()),
            })?;
        }
        let body = serde_json::to_string(&SessionFile {
            token: token.expose_secret().to_owned(),
        })?;
        std::fs::write(&self.path, body).map_err(|e| Error::Session {
            message: format!("failed to write {}: {e}", self.path.display()),
        })?;
        debug!(path = %self.path.display(), "session token stored");
        Ok(())
    }

    fn clear_token(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Session {
                message: format!("failed to remove {}: {e}", self.path.display()),
            }),
        }
    }
}
