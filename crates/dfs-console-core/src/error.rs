//! Error types for the admin console.
//!
//! Failures fall into three classes:
//!
//! - validation rejections, which never reach the network and are reported
//!   as a [`Notice`](crate::browser::Notice) instead of an error
//! - [`ApiError::Rejected`] - the server answered with a non-zero `code`
//! - transport-level failures ([`ApiError::Transport`], [`ApiError::Decode`]),
//!   which are logged and otherwise swallowed by the UI

use thiserror::Error;

/// Failure below the response envelope: the request never produced a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request could not be assembled (bad URL, header, body).
    #[error("failed to build request: {0}")]
    RequestBuild(String),
    /// Connection refused, CORS, DNS and friends.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// No response within the configured ceiling.
    #[error("request timed out")]
    Timeout,
}

/// Token persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Backing storage (localStorage, session file) not available.
    #[error("token storage unavailable")]
    StorageUnavailable,
    #[error("failed to write token: {0}")]
    WriteFailed(String),
    #[error("failed to remove token: {0}")]
    RemoveFailed(String),
}

/// Error returned by [`AdminClient`](crate::api::AdminClient) calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Server returned an envelope with `code != 0`.
    #[error("{message}")]
    Rejected { code: i32, message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Body was not a valid response envelope.
    #[error("invalid response: {0}")]
    Decode(String),
    /// An authenticated endpoint was called without a session.
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Whether this failure carries a server message meant for the user.
    ///
    /// Only [`ApiError::Rejected`] does; everything else is logged only.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
