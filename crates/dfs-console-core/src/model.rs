//! Wire types exchanged with the NameNode REST API.
//!
//! Field names follow the server's camelCase JSON. Sizes, percentages and
//! timestamps on node records arrive pre-formatted as strings and are kept
//! that way.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::path::{self, TRASH_DIR};

// =============================================================================
// Namespace
// =============================================================================

/// Which tree of a user's files a browser screen is looking at.
///
/// Fixed for the lifetime of a screen; switching requires a new navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Regular files.
    #[default]
    Normal,
    /// Entries previously moved to trash.
    Trash,
}

impl Namespace {
    /// Build from an explicit navigation flag.
    pub fn from_trash_flag(trash: bool) -> Self {
        if trash { Self::Trash } else { Self::Normal }
    }

    /// Derive from a query string such as `"?trash=true&x=1"`.
    ///
    /// Anything other than `trash=true` means [`Namespace::Normal`].
    pub fn from_query(query: &str) -> Self {
        let trash = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "trash" && value == "true");
        Self::from_trash_flag(trash)
    }

    pub fn is_trash(self) -> bool {
        matches!(self, Self::Trash)
    }

    /// Server path to list for the displayed path `current`.
    ///
    /// The trash prefix is a detail of the request only and never appears
    /// in displayed state.
    pub fn listing_path(self, current: &str) -> String {
        match self {
            Self::Normal => current.to_string(),
            Self::Trash => format!("{}{}", TRASH_DIR, current),
        }
    }
}

// =============================================================================
// Directory Entries
// =============================================================================

/// Attribute key carrying the raw byte size of a file.
pub const ATTR_FILE_SIZE: &str = "FILE_SIZE";

/// Kind of a directory entry. Encoded on the wire as `1` (file) / `2` (dir).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "u8", into = "u8")]
pub enum EntryKind {
    File,
    Directory,
}

impl From<u8> for EntryKind {
    fn from(value: u8) -> Self {
        if value == 2 { Self::Directory } else { Self::File }
    }
}

impl From<EntryKind> for u8 {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::File => 1,
            EntryKind::Directory => 2,
        }
    }
}

/// One row of a directory listing.
///
/// Identified by `name` (the server calls it `path`: the segment relative to
/// the listed directory), which is assumed unique within one listing.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    #[serde(rename = "path")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Human readable size as formatted by the server.
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub attr: HashMap<String, String>,
}

impl DirEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        let mut attr = HashMap::new();
        attr.insert(ATTR_FILE_SIZE.to_string(), size.to_string());
        Self {
            name: name.into(),
            kind: EntryKind::File,
            file_size: Some(format_size(size)),
            attr,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            file_size: None,
            attr: HashMap::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Raw size in bytes. Directories have none.
    pub fn size_bytes(&self) -> Option<u64> {
        if self.is_dir() {
            return None;
        }
        self.attr.get(ATTR_FILE_SIZE).and_then(|s| s.parse().ok())
    }

    /// Size column text: `--` for directories.
    pub fn display_size(&self) -> String {
        if self.is_dir() {
            return "--".to_string();
        }
        match (&self.file_size, self.size_bytes()) {
            (Some(formatted), _) => formatted.clone(),
            (None, Some(bytes)) => format_size(bytes),
            (None, None) => "--".to_string(),
        }
    }

    /// Absolute path of this entry inside `dir`.
    pub fn path_in(&self, dir: &str) -> String {
        path::concat(dir, &self.name)
    }
}

/// Payload of a `listFiles` response.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Listing {
    #[serde(default)]
    pub children: Vec<DirEntry>,
}

/// Format a byte count the way the NameNode does (`"1.50 KB"`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

// =============================================================================
// Users
// =============================================================================

/// Per-user storage summary.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    /// DataNode hostnames this user is allowed to store on.
    #[serde(default)]
    pub data_nodes: Vec<String>,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub storage_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_storage_size: Option<String>,
}

/// A file-system tenant.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub storage_info: StorageInfo,
}

impl User {
    /// Shape sent when creating or modifying a user.
    pub fn new(username: impl Into<String>, secret: impl Into<String>, data_nodes: Vec<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
            create_time: None,
            storage_info: StorageInfo {
                data_nodes,
                ..Default::default()
            },
        }
    }

    /// Storage size column text.
    pub fn display_storage_size(&self) -> String {
        self.storage_info
            .display_storage_size
            .clone()
            .unwrap_or_else(|| format_size(self.storage_info.storage_size))
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// DataNode health record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataNode {
    pub node_id: Option<i32>,
    pub hostname: String,
    pub http_port: Option<u16>,
    pub nio_port: Option<u16>,
    pub latest_heartbeat_time: Option<String>,
    pub stored_data_size: Option<String>,
    pub free_space: Option<String>,
    pub status: Option<String>,
    pub use_percent: Option<String>,
}

impl DataNode {
    /// Disk usage as a number in `0.0..=100.0`, if the server sent one.
    pub fn use_percent_value(&self) -> Option<f64> {
        self.use_percent
            .as_deref()
            .and_then(|p| p.trim().trim_end_matches('%').parse::<f64>().ok())
            .map(|p| p.clamp(0.0, 100.0))
    }

    /// `"stored / free"` storage column text.
    pub fn usage_summary(&self) -> String {
        format!(
            "{} / {}",
            self.stored_data_size.as_deref().unwrap_or("-"),
            self.free_space.as_deref().unwrap_or("-")
        )
    }
}

/// NameNode (metadata server) record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameNode {
    pub node_id: Option<i32>,
    pub hostname: String,
    pub http_port: Option<u16>,
    pub nio_port: Option<u16>,
    pub backup_node_info: Option<String>,
}
