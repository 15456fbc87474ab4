//! Browser plumbing.
//!
//! Provides:
//! - [`FetchTransport`] - REST transport over `window.fetch` with timeout
//! - [`LocalStorageTokenStore`] - session token persistence
//! - [`logger`] - `log` backend for the browser console
//! - [`dom`] - window, navigation and clipboard helpers

pub mod dom;
mod fetch;
pub mod logger;
mod storage;

use dfs_console_core::{AdminClient, Session};

pub use fetch::FetchTransport;
pub use storage::LocalStorageTokenStore;

use crate::config::{TOKEN_KEY, client_config};

/// Client type used by every screen.
pub type WebClient = AdminClient<FetchTransport, LocalStorageTokenStore>;

/// Build a client over the persisted session.
///
/// Cheap: all state lives in localStorage, so screens build one per call.
pub fn client() -> WebClient {
    AdminClient::new(
        FetchTransport::new(client_config()),
        Session::new(LocalStorageTokenStore::new(TOKEN_KEY)),
    )
}
