//! Command-line front end for the DFS admin console.
//!
//! Shares the REST client and file browser with the web console through
//! `dfs-console-core`; this crate only adds a `reqwest` transport, a session
//! file and the command implementations.

pub mod commands;
pub mod store;
pub mod transport;

pub use store::FileTokenStore;
pub use transport::ReqwestTransport;

/// Client type used by the binary.
pub type CliClient = dfs_console_core::AdminClient<ReqwestTransport, FileTokenStore>;
