//! Session lifecycle.
//!
//! A session is nothing more than a persisted bearer token: its presence means
//! "logged in". There is no client-side expiry. The token lives in a
//! [`TokenStore`] so the browser can keep it in `localStorage` and the CLI in
//! a file, while tests use [`MemoryTokenStore`].

use std::sync::{Arc, Mutex};

use crate::error::SessionError;

/// Persistent slot holding at most one token.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local token store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn with_slot<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> R {
        let mut guard = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.with_slot(|slot| slot.clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        self.with_slot(|slot| *slot = Some(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.with_slot(|slot| *slot = None);
        Ok(())
    }
}

/// Explicit session context handed to the HTTP client.
#[derive(Clone, Debug)]
pub struct Session<S> {
    store: S,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Start a session with `token`, replacing any previous one.
    pub fn login(&self, token: &str) -> Result<(), SessionError> {
        log::info!("session started");
        self.store.save(token)
    }

    /// Destroy the session.
    pub fn logout(&self) -> Result<(), SessionError> {
        log::info!("session cleared");
        self.store.clear()
    }

    pub fn token(&self) -> Option<String> {
        self.store.load().filter(|t| !t.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Value for the `authorization` header, if logged in.
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
