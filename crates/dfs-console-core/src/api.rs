//! REST client for the NameNode admin API.
//!
//! [`AdminClient`] knows every endpoint, the response envelope and the bearer
//! header. Moving bytes is delegated to a [`Transport`]: the browser build
//! uses the Fetch API, the CLI uses `reqwest`, tests use
//! [`MockTransport`](crate::api::mock::MockTransport).

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, TransportError};
use crate::model::{DataNode, DirEntry, Listing, NameNode, User};
use crate::session::{Session, TokenStore};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// =============================================================================
// Configuration
// =============================================================================

/// Default NameNode HTTP endpoint.
pub const DEFAULT_API_BASE: &str = "http://localhost:8081";

/// Default request ceiling in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 5000;

/// Endpoint configuration shared by every transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, no trailing slash.
    pub api_base: String,
    /// Base URL that serves raw file downloads.
    pub file_server_base: String,
    pub timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            file_server_base: DEFAULT_API_BASE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Absolute URL for an API path such as `/api/user/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Direct download link for `entry` inside `dir` of `username`'s tree.
    ///
    /// Mirrors the file server layout `{base}/{user}{dir}/{entry}`; at root
    /// this yields `{base}/{user}//{entry}`, which the file server accepts.
    pub fn download_url(&self, username: &str, dir: &str, entry: &str) -> String {
        format!(
            "{}/{}{}/{}",
            self.file_server_base.trim_end_matches('/'),
            username,
            dir,
            entry
        )
    }
}

// =============================================================================
// Transport
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent, relative to [`ClientConfig::api_base`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    /// Query parameters, unencoded.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<String>,
    /// Full `authorization` header value.
    pub bearer: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let json = serde_json::to_string(body)
            .map_err(|e| TransportError::RequestBuild(e.to_string()))?;
        self.body = Some(json);
        Ok(self)
    }

    /// Look up a query parameter by name.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves an [`HttpRequest`] over the wire.
///
/// Implementations own the base URL and the timeout. They report every
/// status code as a response; the client decides what counts as failure.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =============================================================================
// Envelope
// =============================================================================

/// Standard response wrapper: `code == 0` means success.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Human readable message, `msg` preferred over `message`.
    pub fn message(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| format!("request failed with code {}", self.code))
    }

    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.code == 0 {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                code: self.code,
                message: self.message(),
            })
        }
    }
}

#[derive(Serialize)]
struct PathsBody<'a> {
    username: &'a str,
    paths: &'a [String],
}

// =============================================================================
// Client
// =============================================================================

/// Client for every endpoint the console uses.
#[derive(Clone, Debug)]
pub struct AdminClient<T, S> {
    transport: T,
    session: Session<S>,
}

impl<T: Transport, S: TokenStore> AdminClient<T, S> {
    pub fn new(transport: T, session: Session<S>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and unwrap the envelope.
    ///
    /// Authenticated requests fail fast with [`ApiError::NotLoggedIn`]
    /// when there is no session.
    async fn call<R: DeserializeOwned>(
        &self,
        mut request: HttpRequest,
        authenticated: bool,
    ) -> Result<Option<R>, ApiError> {
        request.bearer = self.session.bearer();
        if authenticated && request.bearer.is_none() {
            return Err(ApiError::NotLoggedIn);
        }

        let method = request.method;
        let path = request.path.clone();
        log::debug!("{} {}", method, path);

        let response = self.transport.send(request).await.inspect_err(|e| {
            log::warn!("{} {} failed: {}", method, path, e);
        })?;

        if !response.is_success() {
            log::warn!("{} {} returned HTTP {}", method, path, response.status);
            return Err(TransportError::Http(response.status).into());
        }

        let envelope: Envelope<R> = serde_json::from_str(&response.body).map_err(|e| {
            log::warn!("{} {} returned an invalid envelope: {}", method, path, e);
            ApiError::Decode(e.to_string())
        })?;

        envelope.into_result().inspect_err(|e| {
            log::debug!("{} {} rejected: {}", method, path, e);
        })
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Check credentials and start a session.
    ///
    /// The NameNode issues no separate token; the username itself becomes
    /// the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let request = HttpRequest::new(Method::Get, "/api/admin/login")
            .query("username", username)
            .query("password", password);
        self.call::<serde_json::Value>(request, false).await?;
        self.session.login(username)?;
        Ok(())
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.logout()?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Files
    // -------------------------------------------------------------------------

    /// List `path` in `username`'s tree. The path is sent as given, trash
    /// prefix included.
    pub async fn list_files(&self, username: &str, path: &str) -> Result<Vec<DirEntry>, ApiError> {
        let request = HttpRequest::new(Method::Get, "/api/user/listFiles")
            .query("username", username)
            .query("path", path);
        let listing: Option<Listing> = self.call(request, true).await?;
        Ok(listing.map(|l| l.children).unwrap_or_default())
    }

    /// Move absolute `paths` to the user's trash. Returns the affected count.
    pub async fn move_to_trash(&self, username: &str, paths: &[String]) -> Result<u64, ApiError> {
        let request = HttpRequest::new(Method::Put, "/api/user/moveToTrash")
            .json(&PathsBody { username, paths })?;
        Ok(self.call::<u64>(request, true).await?.unwrap_or(0))
    }

    /// Restore absolute `paths` from the user's trash. Returns the affected count.
    pub async fn restore_from_trash(&self, username: &str, paths: &[String]) -> Result<u64, ApiError> {
        let request = HttpRequest::new(Method::Put, "/api/user/trash/resume")
            .json(&PathsBody { username, paths })?;
        Ok(self.call::<u64>(request, true).await?.unwrap_or(0))
    }

    /// Hostnames of the DataNodes holding replicas of `path`.
    pub async fn storage_locations(&self, username: &str, path: &str) -> Result<Vec<String>, ApiError> {
        let request = HttpRequest::new(Method::Get, "/api/nodes/getFileStorageInfo")
            .query("username", username)
            .query("path", path);
        let nodes: Option<Vec<DataNode>> = self.call(request, true).await?;
        Ok(nodes
            .unwrap_or_default()
            .into_iter()
            .map(|n| n.hostname)
            .collect())
    }

    /// Ask the NameNode to bring `path` to `replica_num` replicas.
    pub async fn change_replica_num(
        &self,
        username: &str,
        path: &str,
        replica_num: u8,
    ) -> Result<(), ApiError> {
        let request = HttpRequest::new(Method::Get, "/api/nodes/changeReplicaNum")
            .query("path", path)
            .query("username", username)
            .query("replicaNum", replica_num);
        self.call::<serde_json::Value>(request, true).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let request = HttpRequest::new(Method::Get, "/api/user/");
        Ok(self.call(request, true).await?.unwrap_or_default())
    }

    pub async fn get_user(&self, username: &str) -> Result<Option<User>, ApiError> {
        let request = HttpRequest::new(Method::Get, format!("/api/user/{}", username));
        self.call(request, true).await
    }

    pub async fn add_user(&self, user: &User) -> Result<(), ApiError> {
        let request = HttpRequest::new(Method::Post, "/api/user/").json(user)?;
        self.call::<serde_json::Value>(request, true).await?;
        Ok(())
    }

    /// Update a user's secret and DataNode quota.
    pub async fn modify_user(&self, user: &User) -> Result<(), ApiError> {
        let request = HttpRequest::new(Method::Put, "/api/user/").json(user)?;
        self.call::<serde_json::Value>(request, true).await?;
        Ok(())
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), ApiError> {
        let request = HttpRequest::new(Method::Delete, format!("/api/user/{}", username));
        self.call::<serde_json::Value>(request, true).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    pub async fn data_nodes(&self) -> Result<Vec<DataNode>, ApiError> {
        let request = HttpRequest::new(Method::Get, "/api/nodes/datanodes");
        Ok(self.call(request, true).await?.unwrap_or_default())
    }

    pub async fn name_nodes(&self) -> Result<Vec<NameNode>, ApiError> {
        let request = HttpRequest::new(Method::Get, "/api/nodes/namenodes");
        Ok(self.call(request, true).await?.unwrap_or_default())
    }
}
