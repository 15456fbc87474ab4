//! Platform-neutral core of the DFS admin console.
//!
//! This crate holds everything that does not touch the browser or the OS:
//!
//! - [`path`] - absolute path joining and breadcrumb derivation
//! - [`model`] - wire types returned by the NameNode REST API
//! - [`api`] - the REST client, generic over a [`Transport`]
//! - [`session`] - bearer token lifecycle over a pluggable [`TokenStore`]
//! - [`browser`] - the path-scoped file browser state machine
//!
//! The web front end and the CLI each supply their own [`Transport`] and
//! [`TokenStore`] and drive the same [`FileBrowser`].

pub mod api;
pub mod browser;
pub mod error;
pub mod model;
pub mod path;
pub mod session;

pub use api::{AdminClient, ClientConfig, HttpRequest, HttpResponse, Method, Transport};
pub use browser::{
    BatchKind, BatchOutcome, BatchRequest, FileBrowser, ListingRequest, Notice, NoticeLevel,
    PendingAction, Phase, ReplicaEdit, ReplicaRequest, StorageLocationCache, StorageLookup,
    StorageRequest,
};
pub use error::{ApiError, SessionError, TransportError};
pub use model::{DataNode, DirEntry, EntryKind, NameNode, Namespace, StorageInfo, User};
pub use session::{MemoryTokenStore, Session, TokenStore};
