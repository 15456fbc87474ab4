//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the console.

use dfs_console_core::ClientConfig;

// =============================================================================
// Application Metadata
// =============================================================================

/// Title shown in the header and on the login card.
pub const APP_NAME: &str = "DFS Console";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Network Configuration
// =============================================================================

/// NameNode REST API base URL.
pub const API_BASE_URL: &str = "http://localhost:8081";

/// File server base URL used for direct download links.
pub const FILE_SERVER_URL: &str = "http://localhost:8081";

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 5000;

/// Client configuration assembled from the constants above.
pub fn client_config() -> ClientConfig {
    ClientConfig {
        api_base: API_BASE_URL.to_string(),
        file_server_base: FILE_SERVER_URL.to_string(),
        timeout_ms: FETCH_TIMEOUT_MS as u32,
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// localStorage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

// =============================================================================
// UI Configuration
// =============================================================================

/// How long a notice stays on screen, in milliseconds.
pub const NOTICE_LIFETIME_MS: u32 = 3000;

/// Maximum number of notices stacked at once; older ones are dropped.
pub const MAX_NOTICES: usize = 5;

/// Log level installed at startup.
pub const LOG_LEVEL: log::LevelFilter = if cfg!(debug_assertions) {
    log::LevelFilter::Debug
} else {
    log::LevelFilter::Info
};

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
///
/// The theme is fixed at compile time through [`ICON_THEME`], so the
/// variant not selected there is never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
