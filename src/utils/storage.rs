//! Session token persistence in localStorage.

use dfs_console_core::{SessionError, TokenStore};

use crate::utils::dom;

/// [`TokenStore`] backed by a single localStorage key.
#[derive(Clone, Copy, Debug)]
pub struct LocalStorageTokenStore {
    key: &'static str,
}

impl LocalStorageTokenStore {
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        dom::local_storage()?.get_item(self.key).ok()?
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        let storage = dom::local_storage().ok_or(SessionError::StorageUnavailable)?;
        storage
            .set_item(self.key, token)
            .map_err(|e| SessionError::WriteFailed(format!("{:?}", e)))
    }

    fn clear(&self) -> Result<(), SessionError> {
        let storage = dom::local_storage().ok_or(SessionError::StorageUnavailable)?;
        storage
            .remove_item(self.key)
            .map_err(|e| SessionError::RemoveFailed(format!("{:?}", e)))
    }
}
