//! Hash-based routing.
//!
//! URL format:
//! - `#/login`
//! - `#/` or `#/dashboard`
//! - `#/users`, `#/users/new`, `#/users/{name}/edit`
//! - `#/files/{name}` and `#/files/{name}?trash=true`

use dfs_console_core::Namespace;

/// Application routes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    Dashboard,
    Users,
    /// Add (`None`) or modify (`Some(username)`) a user.
    UserEdit { username: Option<String> },
    /// File browser for one user. The namespace is fixed for the screen.
    Files { username: String, namespace: Namespace },
    NotFound,
}

impl AppRoute {
    /// Parse a URL hash into a route.
    pub fn from_hash(hash: &str) -> Self {
        let hash = hash.trim_start_matches('#');
        let (path, query) = match hash.split_once('?') {
            Some((path, query)) => (path, query),
            None => (hash, ""),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["dashboard"] => Self::Dashboard,
            ["login"] => Self::Login,
            ["users"] => Self::Users,
            ["users", "new"] => Self::UserEdit { username: None },
            ["users", name, "edit"] => Self::UserEdit {
                username: Some(name.to_string()),
            },
            ["files", name] => Self::Files {
                username: name.to_string(),
                namespace: Namespace::from_query(query),
            },
            _ => Self::NotFound,
        }
    }

    /// Convert to a URL hash.
    pub fn to_hash(&self) -> String {
        match self {
            Self::Login => "#/login".to_string(),
            Self::Dashboard => "#/dashboard".to_string(),
            Self::Users => "#/users".to_string(),
            Self::UserEdit { username: None } => "#/users/new".to_string(),
            Self::UserEdit {
                username: Some(name),
            } => format!("#/users/{}/edit", name),
            Self::Files {
                username,
                namespace,
            } => {
                if namespace.is_trash() {
                    format!("#/files/{}?trash=true", username)
                } else {
                    format!("#/files/{}", username)
                }
            }
            Self::NotFound => "#/404".to_string(),
        }
    }

    pub fn files(username: impl Into<String>, namespace: Namespace) -> Self {
        Self::Files {
            username: username.into(),
            namespace,
        }
    }

    /// Whether the route can be shown without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// Menu entry highlighted for this route.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Self::Dashboard => Some("dashboard"),
            Self::Users | Self::UserEdit { .. } | Self::Files { .. } => Some("users"),
            Self::Login | Self::NotFound => None,
        }
    }

    /// Get current route from browser URL.
    pub fn current() -> Self {
        let hash = web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default();
        Self::from_hash(&hash)
    }

    /// Navigate to this route.
    ///
    /// Goes through `location.hash` so the router's `hashchange` listener
    /// picks it up.
    pub fn push(&self) {
        crate::utils::dom::set_hash(&self.to_hash());
    }

    /// Navigate without leaving a history entry (redirects).
    pub fn replace(&self) {
        crate::utils::dom::replace_hash(&self.to_hash());
    }
}
