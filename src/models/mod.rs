//! Data models for the web front end.
//!
//! Wire types live in `dfs_console_core::model`; this module only adds
//! [`AppRoute`] for hash-based navigation.

mod route;

pub use route::AppRoute;
