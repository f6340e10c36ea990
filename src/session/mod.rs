//! Session context.
//!
//! The session (`token`, `role`, `username`) is owned by a [`SessionContext`]
//! that screens receive explicitly. It has one way in ([`SessionContext::login`])
//! and one way out ([`SessionContext::logout`], or [`SessionContext::invalidate`]
//! after the backend rejects the token). Persistence is delegated to a
//! [`SessionStore`] so the CLI can keep a login across invocations while tests
//! and embedders stay in memory.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::ClientError;
use crate::models::Role;
use crate::routes::Route;

/// Proof of authentication plus the cached identity claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Raw role claim as issued; see [`Session::role`]
    pub role: String,
    pub username: String,
}

impl Session {
    /// Typed role, `None` when the claim is not one of the known roles
    pub fn role(&self) -> Option<Role> {
        Role::from_claim(&self.role)
    }
}

/// Storage backend for the current session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// TOML file with the keys `token`, `role` and `username`
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
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        match toml::from_str::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // Unreadable session reads as logged out
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string(session).context("Failed to serialize session")?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open session file: {}", self.path.display()))?;

        // An existing file keeps its previous mode on open
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict session file: {}", self.path.display()))?;
        }

        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session file: {}", self.path.display())),
        }
    }
}

/// The session handed to every screen that needs credentials
pub struct SessionContext {
    store: Box<dyn SessionStore>,
    current: Option<Session>,
}

impl SessionContext {
    /// Restore whatever session the store holds
    pub fn new(store: Box<dyn SessionStore>) -> Result<Self> {
        let current = store.load()?;
        Ok(Self { store, current })
    }

    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemorySessionStore::default()),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Bearer token, or [`ClientError::NotLoggedIn`]
    pub fn token(&self) -> Result<&str, ClientError> {
        self.current
            .as_ref()
            .map(|s| s.token.as_str())
            .ok_or(ClientError::NotLoggedIn)
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().and_then(Session::role)
    }

    pub fn username(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.username.as_str())
    }

    /// Replace the current session with a freshly issued one
    pub fn login(&mut self, session: Session) -> Result<(), ClientError> {
        self.store
            .save(&session)
            .map_err(|e| ClientError::Session(format!("{:#}", e)))?;
        tracing::info!(username = %session.username, role = %session.role, "Session started");
        self.current = Some(session);
        Ok(())
    }

    /// Clear token, role and username; the next screen is the login screen.
    /// Fails when the stored copy could not be removed, since it would be
    /// restored on the next start.
    pub fn logout(&mut self) -> Result<Route> {
        if let Some(session) = self.current.take() {
            tracing::info!(username = %session.username, "Session ended");
        }
        self.store.clear().context("Logged out, but the stored session remains")?;
        Ok(Route::Login)
    }

    /// Drop the session if `err` means the backend no longer accepts it.
    /// Returns the route to force re-login, if one is needed.
    pub fn invalidate(&mut self, err: &ClientError) -> Option<Route> {
        if err.is_unauthorized() {
            tracing::warn!(code = err.code().as_str(), "Credentials rejected, clearing session");
            if let Err(e) = self.logout() {
                tracing::warn!(error = %format!("{:#}", e), "Failed to clear stored session");
            }
            Some(Route::Login)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("username", &self.username())
            .field("role", &self.current.as_ref().map(|s| s.role.as_str()))
            .finish()
    }
}
