//! Session file in the platform config directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dfs_console_core::{SessionError, TokenStore};

const APP_DIR: &str = "dfs-console";
const SESSION_FILE: &str = "session";

/// [`TokenStore`] backed by a single file holding the token.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/dfs-console/session`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::WriteFailed(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| SessionError::WriteFailed(e.to_string()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::RemoveFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_save_creates_parent_and_load_reads_back() {
        let temp = TempDir::new().unwrap();
        let store = FileTokenStore::new(temp.path().join("nested").join(SESSION_FILE));

        assert_eq!(store.load(), None);
        store.save("admin").unwrap();
        assert_eq!(store.load(), Some("admin".to_string()));
    }

    #[test]
    fn test_load_trims_and_ignores_blank_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SESSION_FILE);
        let store = FileTokenStore::new(&path);

        fs::write(&path, "admin\n").unwrap();
        assert_eq!(store.load(), Some("admin".to_string()));

        fs::write(&path, "  \n").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = FileTokenStore::new(temp.path().join(SESSION_FILE));

        store.save("admin").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }
}
