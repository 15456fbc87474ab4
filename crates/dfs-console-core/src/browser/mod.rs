//! Path-scoped file browser.
//!
//! [`FileBrowser`] is a synchronous state machine. Every operation that needs
//! the server returns a request ticket; the caller performs the call (see
//! [`driver`]) and hands the result back to the matching `apply_*` method.
//! Listing tickets carry a sequence number so that a slow response for an
//! older navigation can never overwrite a newer one.

pub mod driver;
mod notice;
mod storage;

use std::collections::BTreeSet;

pub use notice::{Notice, NoticeLevel};
pub use storage::{StorageLocationCache, StorageLookup};

use crate::error::ApiError;
use crate::model::{DirEntry, Namespace};
use crate::path::{self, Crumb};

/// Lowest replica count accepted by the replica editor.
pub const MIN_REPLICAS: u8 = 1;
/// Highest replica count accepted by the replica editor.
pub const MAX_REPLICAS: u8 = 5;

// =============================================================================
// States
// =============================================================================

/// The batch operation a confirmation dialog stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchKind {
    MoveToTrash,
    Restore,
}

impl BatchKind {
    /// Deleting in the trash namespace means restoring.
    pub fn for_namespace(namespace: Namespace) -> Self {
        if namespace.is_trash() {
            Self::Restore
        } else {
            Self::MoveToTrash
        }
    }

    /// Button and dialog title.
    pub fn label(self) -> &'static str {
        match self {
            Self::MoveToTrash => "Delete",
            Self::Restore => "Restore",
        }
    }

    fn success_message(self, count: u64) -> String {
        match self {
            Self::MoveToTrash => format!("Moved {} item(s) to trash", count),
            Self::Restore => format!("Restored {} item(s)", count),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingListing,
    /// Confirmation dialog open for the staged [`PendingAction`].
    Confirming(BatchKind),
    EditingReplicaCount,
    /// Replica hosts requested for this absolute path.
    FetchingStorageLocations(String),
}

/// Absolute paths staged for delete or restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub kind: BatchKind,
    pub paths: Vec<String>,
}

/// Replica editor contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicaEdit {
    pub path: String,
    pub value: u8,
}

// =============================================================================
// Request tickets
// =============================================================================

/// A directory listing to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRequest {
    pub seq: u64,
    pub username: String,
    /// Path sent to the server (trash prefix applied).
    pub fetch_path: String,
    /// Path shown once the listing lands.
    pub display_path: String,
}

/// A confirmed delete or restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchRequest {
    pub kind: BatchKind,
    pub username: String,
    pub paths: Vec<String>,
    /// Directory to list once the batch succeeds.
    pub refresh_target: String,
}

/// What happened after a batch call returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    pub notice: Option<Notice>,
    /// Follow-up listing, issued only on success.
    pub refresh: Option<ListingRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicaRequest {
    pub username: String,
    pub path: String,
    pub replica_num: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageRequest {
    /// Listing generation the lookup was issued against.
    pub generation: u64,
    pub username: String,
    pub path: String,
}

// =============================================================================
// FileBrowser
// =============================================================================

/// File browser for one user in one namespace.
///
/// The namespace is fixed at construction; switching between the normal and
/// trash views means building a new browser.
#[derive(Clone, Debug)]
pub struct FileBrowser {
    username: String,
    namespace: Namespace,
    current_path: String,
    entries: Vec<DirEntry>,
    selection: BTreeSet<String>,
    storage: StorageLocationCache,
    phase: Phase,
    pending: Option<PendingAction>,
    replica_edit: Option<ReplicaEdit>,
    /// Sequence number of the latest issued listing.
    listing_seq: u64,
    /// Bumped every time a listing is applied.
    generation: u64,
}

impl FileBrowser {
    /// A browser parked at root with nothing loaded. Call
    /// [`navigate`](Self::navigate) or [`refresh`](Self::refresh) to fill it.
    pub fn new(username: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            username: username.into(),
            namespace,
            current_path: path::ROOT.to_string(),
            entries: Vec::new(),
            selection: BTreeSet::new(),
            storage: StorageLocationCache::new(),
            phase: Phase::Idle,
            pending: None,
            replica_edit: None,
            listing_seq: 0,
            generation: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn replica_edit(&self) -> Option<&ReplicaEdit> {
        self.replica_edit.as_ref()
    }

    pub fn storage(&self) -> &StorageLocationCache {
        &self.storage
    }

    /// Number of listings applied so far. Changes whenever `entries` is
    /// replaced, so it can key rendered rows.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::AwaitingListing
    }

    /// Per-file actions (download, copy, delete, replicas, locations) are
    /// hidden in the trash view.
    pub fn allows_file_actions(&self) -> bool {
        !self.namespace.is_trash()
    }

    pub fn batch_kind(&self) -> BatchKind {
        BatchKind::for_namespace(self.namespace)
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        path::breadcrumbs(&self.current_path)
    }

    /// Absolute path of an entry in the current directory.
    pub fn entry_path(&self, name: &str) -> String {
        path::concat(&self.current_path, name)
    }

    pub fn entry(&self, name: &str) -> Option<&DirEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Start loading `target`. Allowed from any state; open dialogs close.
    pub fn navigate(&mut self, target: &str) -> ListingRequest {
        let display_path = path::normalize(target);
        self.listing_seq += 1;
        self.phase = Phase::AwaitingListing;
        self.replica_edit = None;

        log::debug!(
            "listing #{} {} ({:?})",
            self.listing_seq,
            display_path,
            self.namespace
        );

        ListingRequest {
            seq: self.listing_seq,
            username: self.username.clone(),
            fetch_path: self.namespace.listing_path(&display_path),
            display_path,
        }
    }

    /// Reload the current directory.
    pub fn refresh(&mut self) -> ListingRequest {
        let current = self.current_path.clone();
        self.navigate(&current)
    }

    /// Descend into a directory entry. Files cannot be opened.
    pub fn open(&mut self, name: &str) -> Option<ListingRequest> {
        let entry = self.entry(name)?;
        if !entry.is_dir() {
            return None;
        }
        let target = self.entry_path(name);
        Some(self.navigate(&target))
    }

    /// Jump to breadcrumb `index` of the current path.
    pub fn open_crumb(&mut self, index: usize) -> Option<ListingRequest> {
        let target = path::crumb_target(&self.current_path, index)?;
        Some(self.navigate(&target))
    }

    /// Whether `request` is the latest issued listing.
    pub fn is_current(&self, request: &ListingRequest) -> bool {
        request.seq == self.listing_seq
    }

    /// Apply a listing result.
    ///
    /// Stale tickets are dropped. On success the view is replaced wholesale
    /// and selection, staged action and storage cache are cleared. A server
    /// rejection returns an error notice and leaves the previous view in
    /// place; a transport failure is logged and the browser stays in
    /// [`Phase::AwaitingListing`].
    pub fn apply_listing(
        &mut self,
        request: &ListingRequest,
        result: Result<Vec<DirEntry>, ApiError>,
    ) -> Option<Notice> {
        if !self.is_current(request) {
            log::debug!(
                "dropping stale listing #{} (latest #{})",
                request.seq,
                self.listing_seq
            );
            return None;
        }

        match result {
            Ok(entries) => {
                self.current_path = request.display_path.clone();
                self.entries = entries;
                self.selection.clear();
                self.storage.clear();
                self.pending = None;
                self.replica_edit = None;
                self.generation += 1;
                self.phase = Phase::Idle;
                None
            }
            Err(e) if e.is_user_visible() => {
                self.phase = Phase::Idle;
                Some(Notice::error(e.to_string()))
            }
            Err(e) => {
                log::warn!("listing {} failed: {}", request.fetch_path, e);
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Replace the selection. Names not in the listing are ignored.
    pub fn select<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let selection: BTreeSet<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n| self.entry(n).is_some())
            .collect();
        self.selection = selection;
    }

    /// Check or uncheck one entry.
    pub fn toggle(&mut self, name: &str, checked: bool) {
        if checked {
            if self.entry(name).is_some() {
                self.selection.insert(name.to_string());
            }
        } else {
            self.selection.remove(name);
        }
    }

    pub fn select_all(&mut self, checked: bool) {
        if checked {
            self.selection = self.entries.iter().map(|e| e.name.clone()).collect();
        } else {
            self.selection.clear();
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.contains(name)
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn all_selected(&self) -> bool {
        !self.entries.is_empty() && self.selection.len() == self.entries.len()
    }

    /// Absolute paths of the selected entries, in listing order.
    pub fn selected_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| self.selection.contains(&e.name))
            .map(|e| self.entry_path(&e.name))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Batch delete / restore
    // -------------------------------------------------------------------------

    /// Whether a new action may start. A storage lookup in flight does not
    /// block; a listing, a batch call or an open dialog does.
    pub fn accepts_actions(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::FetchingStorageLocations(_))
    }

    /// Stage the selection for the batch action and open the confirmation.
    ///
    /// An empty selection, or a browser that is busy, produces an info
    /// notice and changes nothing.
    pub fn request_batch_action(&mut self) -> Result<(), Notice> {
        if !self.accepts_actions() {
            return Err(Notice::info("Wait for the current operation to finish"));
        }
        let paths = self.selected_paths();
        if paths.is_empty() {
            return Err(Notice::info(format!(
                "Select at least one entry to {}",
                self.batch_kind().label().to_lowercase()
            )));
        }
        let kind = self.batch_kind();
        self.pending = Some(PendingAction { kind, paths });
        self.phase = Phase::Confirming(kind);
        Ok(())
    }

    /// Stage a single file for deletion from its row action. Directories
    /// go through the batch selection only.
    pub fn request_single_delete(&mut self, name: &str) -> bool {
        if !self.allows_file_actions() || !self.accepts_actions() {
            return false;
        }
        match self.entry(name) {
            Some(entry) if !entry.is_dir() => {}
            _ => return false,
        }
        let kind = BatchKind::MoveToTrash;
        self.pending = Some(PendingAction {
            kind,
            paths: vec![self.entry_path(name)],
        });
        self.phase = Phase::Confirming(kind);
        true
    }

    /// Close the confirmation. The staged action and selection survive.
    pub fn cancel_batch(&mut self) {
        if matches!(self.phase, Phase::Confirming(_)) {
            self.phase = Phase::Idle;
        }
    }

    /// Confirm the staged action and hand out the call to make.
    ///
    /// The refresh target is decided now: root when the listing has at most
    /// one entry (it may be gone after the call), else the current path.
    pub fn confirm_batch(&mut self) -> Option<BatchRequest> {
        if !matches!(self.phase, Phase::Confirming(_)) {
            return None;
        }
        let pending = self.pending.clone()?;
        let refresh_target = if self.entries.len() > 1 {
            self.current_path.clone()
        } else {
            path::ROOT.to_string()
        };
        self.phase = Phase::AwaitingListing;
        Some(BatchRequest {
            kind: pending.kind,
            username: self.username.clone(),
            paths: pending.paths,
            refresh_target,
        })
    }

    /// Apply the result of a batch call.
    ///
    /// Success reports the affected count and issues the refresh. Any failure
    /// reopens the confirmation so the user can retry or cancel.
    pub fn apply_batch(
        &mut self,
        request: &BatchRequest,
        result: Result<u64, ApiError>,
    ) -> BatchOutcome {
        match result {
            Ok(count) => {
                log::info!(
                    "{:?} of {} path(s) affected {}",
                    request.kind,
                    request.paths.len(),
                    count
                );
                let refresh = self.navigate(&request.refresh_target);
                BatchOutcome {
                    notice: Some(Notice::success(request.kind.success_message(count))),
                    refresh: Some(refresh),
                }
            }
            Err(e) => {
                self.phase = Phase::Confirming(request.kind);
                let notice = if e.is_user_visible() {
                    Some(Notice::error(format!("{} failed: {}", request.kind.label(), e)))
                } else {
                    log::warn!("{:?} failed: {}", request.kind, e);
                    None
                };
                BatchOutcome {
                    notice,
                    refresh: None,
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Replica count
    // -------------------------------------------------------------------------

    /// Open the replica editor for a file, starting at [`MIN_REPLICAS`].
    pub fn request_replica_edit(&mut self, name: &str) -> bool {
        if !self.allows_file_actions() || !self.accepts_actions() {
            return false;
        }
        match self.entry(name) {
            Some(entry) if !entry.is_dir() => {}
            _ => return false,
        }
        self.replica_edit = Some(ReplicaEdit {
            path: self.entry_path(name),
            value: MIN_REPLICAS,
        });
        self.phase = Phase::EditingReplicaCount;
        true
    }

    /// Update the editor value, clamped to the accepted range.
    pub fn set_replica_value(&mut self, value: u8) {
        if let Some(edit) = self.replica_edit.as_mut() {
            edit.value = value.clamp(MIN_REPLICAS, MAX_REPLICAS);
        }
    }

    pub fn cancel_replica_edit(&mut self) {
        self.replica_edit = None;
        if self.phase == Phase::EditingReplicaCount {
            self.phase = Phase::Idle;
        }
    }

    /// Close the editor and hand out the call to make. No refresh follows.
    pub fn confirm_replica(&mut self) -> Option<ReplicaRequest> {
        if self.phase != Phase::EditingReplicaCount {
            return None;
        }
        let edit = self.replica_edit.take()?;
        self.phase = Phase::Idle;
        Some(ReplicaRequest {
            username: self.username.clone(),
            path: edit.path,
            replica_num: edit.value,
        })
    }

    /// Notice for a finished replica change.
    pub fn apply_replica(&self, request: &ReplicaRequest, result: Result<(), ApiError>) -> Option<Notice> {
        match result {
            Ok(()) => Some(Notice::success(format!(
                "Replica count of {} set to {}; refresh to see placement changes",
                request.path, request.replica_num
            ))),
            Err(e) if e.is_user_visible() => Some(Notice::error(format!(
                "Replica change failed: {}",
                e
            ))),
            Err(e) => {
                log::warn!("replica change for {} failed: {}", request.path, e);
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Storage locations
    // -------------------------------------------------------------------------

    /// Ask for the replica hosts of a file.
    ///
    /// Returns `None` for directories, unknown names, the trash view, and
    /// lookups already cached or in flight.
    pub fn request_storage_locations(&mut self, name: &str) -> Option<StorageRequest> {
        if !self.allows_file_actions() {
            return None;
        }
        let entry = self.entry(name)?;
        if entry.is_dir() {
            return None;
        }
        let path = self.entry_path(name);
        if self.storage.contains(&path) || !self.storage.begin(&path) {
            return None;
        }
        if self.phase == Phase::Idle {
            self.phase = Phase::FetchingStorageLocations(path.clone());
        }
        Some(StorageRequest {
            generation: self.generation,
            username: self.username.clone(),
            path,
        })
    }

    /// Record a storage lookup result. Results for a listing that has since
    /// been replaced are dropped.
    pub fn apply_storage_locations(
        &mut self,
        request: &StorageRequest,
        result: Result<Vec<String>, ApiError>,
    ) -> Option<Notice> {
        if request.generation != self.generation {
            log::debug!("dropping storage lookup for {} from an old listing", request.path);
            return None;
        }
        if self.phase == Phase::FetchingStorageLocations(request.path.clone()) {
            self.phase = Phase::Idle;
        }
        match result {
            Ok(hosts) => {
                self.storage.insert(&request.path, hosts);
                None
            }
            Err(e) => {
                self.storage.abandon(&request.path);
                if e.is_user_visible() {
                    Some(Notice::error(e.to_string()))
                } else {
                    log::warn!("storage lookup for {} failed: {}", request.path, e);
                    None
                }
            }
        }
    }

    pub fn storage_lookup(&self, name: &str) -> StorageLookup<'_> {
        self.storage.lookup(&self.entry_path(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    fn rejected(msg: &str) -> ApiError {
        ApiError::Rejected {
            code: 1,
            message: msg.to_string(),
        }
    }

    fn loaded(namespace: Namespace, path: &str, entries: Vec<DirEntry>) -> FileBrowser {
        let mut browser = FileBrowser::new("alice", namespace);
        let req = browser.navigate(path);
        browser.apply_listing(&req, Ok(entries));
        browser
    }

    fn sample() -> Vec<DirEntry> {
        vec![
            DirEntry::directory("docs"),
            DirEntry::file("a.txt", 10),
            DirEntry::file("b.txt", 20),
        ]
    }

    #[test]
    fn test_trash_listing_prefix() {
        let mut browser = FileBrowser::new("alice", Namespace::Trash);
        let req = browser.navigate("/docs");
        assert_eq!(req.fetch_path, "/.Trash/docs");
        assert_eq!(req.display_path, "/docs");

        browser.apply_listing(&req, Ok(vec![]));
        assert_eq!(browser.current_path(), "/docs");
    }

    #[test]
    fn test_normal_listing_has_no_prefix() {
        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        let req = browser.navigate("/docs");
        assert_eq!(req.fetch_path, "/docs");
        assert_eq!(req.username, "alice");
    }

    #[test]
    fn test_navigate_sets_awaiting() {
        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        browser.navigate("/");
        assert!(browser.is_loading());
    }

    #[test]
    fn test_successful_listing_replaces_view() {
        let browser = loaded(Namespace::Normal, "/docs", sample());
        assert_eq!(browser.phase(), &Phase::Idle);
        assert_eq!(browser.current_path(), "/docs");
        assert_eq!(browser.entries().len(), 3);
    }

    #[test]
    fn test_stale_listing_is_discarded() {
        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        let first = browser.navigate("/slow");
        let second = browser.navigate("/fast");

        browser.apply_listing(&second, Ok(vec![DirEntry::file("fast.txt", 1)]));
        let notice = browser.apply_listing(&first, Ok(vec![DirEntry::file("slow.txt", 1)]));

        assert!(notice.is_none());
        assert_eq!(browser.current_path(), "/fast");
        assert_eq!(browser.entries()[0].name, "fast.txt");
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        let first = browser.navigate("/a");
        let _second = browser.navigate("/b");
        assert!(browser.apply_listing(&first, Err(rejected("gone"))).is_none());
        assert!(browser.is_loading());
    }

    #[test]
    fn test_rejected_listing_keeps_view() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        let req = browser.navigate("/missing");
        let notice = browser.apply_listing(&req, Err(rejected("no such directory")));

        assert_eq!(notice, Some(Notice::error("no such directory")));
        assert_eq!(browser.phase(), &Phase::Idle);
        assert_eq!(browser.current_path(), "/docs");
        assert_eq!(browser.entries().len(), 3);
    }

    #[test]
    fn test_transport_failure_is_swallowed() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        let req = browser.navigate("/other");
        let notice = browser.apply_listing(&req, Err(TransportError::Timeout.into()));

        assert!(notice.is_none());
        assert!(browser.is_loading());
        assert_eq!(browser.current_path(), "/docs");
    }

    #[test]
    fn test_open_only_directories() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        assert!(browser.open("a.txt").is_none());
        assert!(browser.open("nope").is_none());

        let req = browser.open("docs").unwrap();
        assert_eq!(req.display_path, "/docs");
    }

    #[test]
    fn test_open_crumb() {
        let mut browser = loaded(Namespace::Normal, "/a/b/c", vec![]);
        let req = browser.open_crumb(1).unwrap();
        assert_eq!(req.display_path, "/a/b");
        assert!(browser.open_crumb(3).is_none());
    }

    #[test]
    fn test_selection_clears_on_refresh() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt", "b.txt"]);
        assert_eq!(browser.selection().len(), 2);

        let req = browser.refresh();
        browser.apply_listing(&req, Ok(sample()));
        assert!(browser.selection().is_empty());
    }

    #[test]
    fn test_select_ignores_unknown_names() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt", "ghost"]);
        assert!(browser.is_selected("a.txt"));
        assert!(!browser.is_selected("ghost"));
    }

    #[test]
    fn test_toggle_and_select_all() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.toggle("docs", true);
        browser.toggle("a.txt", true);
        browser.toggle("docs", false);
        assert_eq!(browser.selected_paths(), vec!["/a.txt"]);

        browser.select_all(true);
        assert!(browser.all_selected());
        browser.select_all(false);
        assert!(browser.selection().is_empty());
    }

    #[test]
    fn test_selected_paths_are_absolute() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        browser.select(["b.txt", "docs"]);
        assert_eq!(browser.selected_paths(), vec!["/docs/docs", "/docs/b.txt"]);
    }

    #[test]
    fn test_empty_selection_yields_notice() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        let err = browser.request_batch_action().unwrap_err();
        assert_eq!(err.level, NoticeLevel::Info);
        assert_eq!(browser.phase(), &Phase::Idle);
        assert!(browser.pending().is_none());
    }

    #[test]
    fn test_batch_kind_follows_namespace() {
        let mut browser = loaded(Namespace::Trash, "/", sample());
        browser.select(["a.txt"]);
        browser.request_batch_action().unwrap();
        assert_eq!(browser.phase(), &Phase::Confirming(BatchKind::Restore));

        let req = browser.confirm_batch().unwrap();
        assert_eq!(req.kind, BatchKind::Restore);
        assert_eq!(req.paths, vec!["/a.txt"]);
    }

    #[test]
    fn test_cancel_preserves_selection_and_target() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt"]);
        browser.request_batch_action().unwrap();
        browser.cancel_batch();

        assert_eq!(browser.phase(), &Phase::Idle);
        assert!(browser.is_selected("a.txt"));
        assert_eq!(browser.pending().unwrap().paths, vec!["/a.txt"]);
    }

    #[test]
    fn test_confirm_requires_open_dialog() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        assert!(browser.confirm_batch().is_none());
    }

    #[test]
    fn test_refresh_target_is_root_for_last_entry() {
        let mut browser = loaded(Namespace::Normal, "/docs", vec![DirEntry::file("only.txt", 1)]);
        browser.select(["only.txt"]);
        browser.request_batch_action().unwrap();
        let req = browser.confirm_batch().unwrap();
        assert_eq!(req.refresh_target, "/");
    }

    #[test]
    fn test_refresh_target_is_current_otherwise() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        browser.select(["a.txt"]);
        browser.request_batch_action().unwrap();
        let req = browser.confirm_batch().unwrap();
        assert_eq!(req.refresh_target, "/docs");
    }

    #[test]
    fn test_batch_success_refreshes_and_clears() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        browser.select(["a.txt", "b.txt"]);
        browser.request_batch_action().unwrap();
        let req = browser.confirm_batch().unwrap();

        let outcome = browser.apply_batch(&req, Ok(2));
        assert_eq!(outcome.notice.unwrap().level, NoticeLevel::Success);
        let refresh = outcome.refresh.unwrap();
        assert_eq!(refresh.display_path, "/docs");

        browser.apply_listing(&refresh, Ok(vec![DirEntry::directory("docs")]));
        assert!(browser.selection().is_empty());
        assert!(browser.pending().is_none());
        assert_eq!(browser.phase(), &Phase::Idle);
    }

    #[test]
    fn test_batch_rejection_reopens_dialog() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt"]);
        browser.request_batch_action().unwrap();
        let req = browser.confirm_batch().unwrap();

        let outcome = browser.apply_batch(&req, Err(rejected("locked")));
        assert_eq!(outcome.notice, Some(Notice::error("Delete failed: locked")));
        assert!(outcome.refresh.is_none());
        assert_eq!(browser.phase(), &Phase::Confirming(BatchKind::MoveToTrash));
        assert!(browser.is_selected("a.txt"));
    }

    #[test]
    fn test_batch_transport_failure_has_no_notice() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt"]);
        browser.request_batch_action().unwrap();
        let req = browser.confirm_batch().unwrap();

        let outcome = browser.apply_batch(&req, Err(TransportError::Http(502).into()));
        assert!(outcome.notice.is_none());
        assert!(outcome.refresh.is_none());
    }

    #[test]
    fn test_single_delete_stages_one_path() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        browser.select(["b.txt"]);
        assert!(browser.request_single_delete("a.txt"));
        assert_eq!(browser.pending().unwrap().paths, vec!["/docs/a.txt"]);
        assert!(!browser.request_single_delete("b.txt"));
    }

    #[test]
    fn test_single_delete_refuses_directories() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        assert!(!browser.request_single_delete("docs"));
        assert!(browser.pending().is_none());
        assert_eq!(browser.phase(), &Phase::Idle);
    }

    #[test]
    fn test_batch_in_flight_blocks_new_actions() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt"]);
        browser.request_batch_action().unwrap();
        browser.confirm_batch().unwrap();
        assert_eq!(browser.phase(), &Phase::AwaitingListing);

        let err = browser.request_batch_action().unwrap_err();
        assert_eq!(err.level, NoticeLevel::Info);
        assert_eq!(browser.phase(), &Phase::AwaitingListing);
        assert!(browser.confirm_batch().is_none());
        assert!(!browser.request_single_delete("b.txt"));
        assert!(!browser.request_replica_edit("b.txt"));
    }

    #[test]
    fn test_loading_listing_blocks_file_actions() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt"]);
        browser.refresh();

        assert!(browser.request_batch_action().is_err());
        assert!(!browser.request_single_delete("a.txt"));
        assert!(!browser.request_replica_edit("b.txt"));
        assert!(browser.pending().is_none());
    }

    #[test]
    fn test_open_dialog_rejects_second_request() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.select(["a.txt"]);
        assert!(browser.request_replica_edit("b.txt"));

        assert!(browser.request_batch_action().is_err());
        assert_eq!(browser.phase(), &Phase::EditingReplicaCount);
        assert!(browser.pending().is_none());
    }

    #[test]
    fn test_storage_lookup_does_not_block_actions() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.request_storage_locations("a.txt").unwrap();
        assert!(browser.request_single_delete("b.txt"));
        assert_eq!(browser.phase(), &Phase::Confirming(BatchKind::MoveToTrash));
    }

    #[test]
    fn test_trash_hides_file_actions() {
        let mut browser = loaded(Namespace::Trash, "/", sample());
        assert!(!browser.allows_file_actions());
        assert!(!browser.request_single_delete("a.txt"));
        assert!(!browser.request_replica_edit("a.txt"));
        assert!(browser.request_storage_locations("a.txt").is_none());
    }

    #[test]
    fn test_replica_edit_flow() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        assert!(!browser.request_replica_edit("docs"));
        assert!(browser.request_replica_edit("a.txt"));
        assert_eq!(browser.replica_edit().unwrap().value, MIN_REPLICAS);

        browser.set_replica_value(9);
        assert_eq!(browser.replica_edit().unwrap().value, MAX_REPLICAS);
        browser.set_replica_value(0);
        assert_eq!(browser.replica_edit().unwrap().value, MIN_REPLICAS);
        browser.set_replica_value(3);

        let req = browser.confirm_replica().unwrap();
        assert_eq!(req.path, "/docs/a.txt");
        assert_eq!(req.replica_num, 3);
        assert_eq!(browser.phase(), &Phase::Idle);

        let notice = browser.apply_replica(&req, Ok(())).unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
    }

    #[test]
    fn test_replica_cancel() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        browser.request_replica_edit("a.txt");
        browser.cancel_replica_edit();
        assert_eq!(browser.phase(), &Phase::Idle);
        assert!(browser.confirm_replica().is_none());
    }

    #[test]
    fn test_storage_lookup_lifecycle() {
        let mut browser = loaded(Namespace::Normal, "/docs", sample());
        assert!(browser.request_storage_locations("docs").is_none());
        assert_eq!(browser.storage_lookup("a.txt"), StorageLookup::Unfetched);

        let req = browser.request_storage_locations("a.txt").unwrap();
        assert_eq!(req.path, "/docs/a.txt");
        assert_eq!(browser.storage_lookup("a.txt"), StorageLookup::Loading);
        assert!(browser.request_storage_locations("a.txt").is_none());

        browser.apply_storage_locations(&req, Ok(vec![]));
        assert_eq!(browser.storage_lookup("a.txt"), StorageLookup::Fetched(&[]));
        assert_eq!(browser.phase(), &Phase::Idle);
        assert!(browser.request_storage_locations("a.txt").is_none());
    }

    #[test]
    fn test_storage_cache_clears_on_refresh() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        let req = browser.request_storage_locations("a.txt").unwrap();
        browser.apply_storage_locations(&req, Ok(vec!["dn1".to_string()]));

        let refresh = browser.refresh();
        browser.apply_listing(&refresh, Ok(sample()));
        assert_eq!(browser.storage_lookup("a.txt"), StorageLookup::Unfetched);
    }

    #[test]
    fn test_storage_result_for_old_listing_is_dropped() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        let req = browser.request_storage_locations("a.txt").unwrap();

        let refresh = browser.refresh();
        browser.apply_listing(&refresh, Ok(sample()));
        browser.apply_storage_locations(&req, Ok(vec!["dn1".to_string()]));
        assert_eq!(browser.storage_lookup("a.txt"), StorageLookup::Unfetched);
    }

    #[test]
    fn test_storage_rejection_allows_retry() {
        let mut browser = loaded(Namespace::Normal, "/", sample());
        let req = browser.request_storage_locations("a.txt").unwrap();
        let notice = browser.apply_storage_locations(&req, Err(rejected("no such file")));
        assert!(notice.unwrap().is_error());
        assert!(browser.request_storage_locations("a.txt").is_some());
    }
}
