//! Async glue between [`FileBrowser`] tickets and [`AdminClient`] calls.
//!
//! Front ends that can hold `&mut FileBrowser` across an await (the CLI,
//! tests) use these directly. The web front end keeps the browser in a
//! signal and runs the same steps around `spawn_local`.

use super::{BatchKind, BatchRequest, FileBrowser, ListingRequest, Notice, ReplicaRequest, StorageRequest};
use crate::api::{AdminClient, Transport};
use crate::error::ApiError;
use crate::model::DirEntry;
use crate::session::TokenStore;

/// Fetch the listing a ticket stands for.
pub async fn fetch_listing<T: Transport, S: TokenStore>(
    client: &AdminClient<T, S>,
    request: &ListingRequest,
) -> Result<Vec<DirEntry>, ApiError> {
    client.list_files(&request.username, &request.fetch_path).await
}

/// Issue the delete or restore call for a confirmed batch.
pub async fn execute_batch<T: Transport, S: TokenStore>(
    client: &AdminClient<T, S>,
    request: &BatchRequest,
) -> Result<u64, ApiError> {
    match request.kind {
        BatchKind::MoveToTrash => client.move_to_trash(&request.username, &request.paths).await,
        BatchKind::Restore => client.restore_from_trash(&request.username, &request.paths).await,
    }
}

pub async fn execute_replica_change<T: Transport, S: TokenStore>(
    client: &AdminClient<T, S>,
    request: &ReplicaRequest,
) -> Result<(), ApiError> {
    client
        .change_replica_num(&request.username, &request.path, request.replica_num)
        .await
}

pub async fn fetch_storage_locations<T: Transport, S: TokenStore>(
    client: &AdminClient<T, S>,
    request: &StorageRequest,
) -> Result<Vec<String>, ApiError> {
    client.storage_locations(&request.username, &request.path).await
}

/// Fetch and apply one listing ticket.
pub async fn load<T: Transport, S: TokenStore>(
    browser: &mut FileBrowser,
    client: &AdminClient<T, S>,
    request: ListingRequest,
) -> Option<Notice> {
    let result = fetch_listing(client, &request).await;
    browser.apply_listing(&request, result)
}

/// Navigate to `target` and wait for the listing.
pub async fn navigate<T: Transport, S: TokenStore>(
    browser: &mut FileBrowser,
    client: &AdminClient<T, S>,
    target: &str,
) -> Option<Notice> {
    let request = browser.navigate(target);
    load(browser, client, request).await
}

/// Run the confirmed batch and the refresh that follows it.
///
/// Returns every notice raised along the way, oldest first.
pub async fn confirm_batch<T: Transport, S: TokenStore>(
    browser: &mut FileBrowser,
    client: &AdminClient<T, S>,
) -> Vec<Notice> {
    let Some(request) = browser.confirm_batch() else {
        return Vec::new();
    };
    let result = execute_batch(client, &request).await;
    let outcome = browser.apply_batch(&request, result);

    let mut notices: Vec<Notice> = outcome.notice.into_iter().collect();
    if let Some(refresh) = outcome.refresh {
        notices.extend(load(browser, client, refresh).await);
    }
    notices
}

/// Submit the replica editor contents.
pub async fn confirm_replica<T: Transport, S: TokenStore>(
    browser: &mut FileBrowser,
    client: &AdminClient<T, S>,
) -> Option<Notice> {
    let request = browser.confirm_replica()?;
    let result = execute_replica_change(client, &request).await;
    browser.apply_replica(&request, result)
}

/// Look up the replica hosts of `name` in the current directory.
pub async fn locate<T: Transport, S: TokenStore>(
    browser: &mut FileBrowser,
    client: &AdminClient<T, S>,
    name: &str,
) -> Option<Notice> {
    let request = browser.request_storage_locations(name)?;
    let result = fetch_storage_locations(client, &request).await;
    browser.apply_storage_locations(&request, result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::mock::MockTransport;
    use crate::browser::{NoticeLevel, Phase, StorageLookup};
    use crate::model::Namespace;
    use crate::session::{MemoryTokenStore, Session};

    fn client() -> (MockTransport, AdminClient<MockTransport, MemoryTokenStore>) {
        let transport = MockTransport::new();
        let session = Session::new(MemoryTokenStore::with_token("admin"));
        (transport.clone(), AdminClient::new(transport, session))
    }

    fn listing(names: &[(&str, u8)]) -> serde_json::Value {
        let children: Vec<_> = names
            .iter()
            .map(|(name, kind)| json!({"path": name, "type": kind, "fileSize": "1 B"}))
            .collect();
        json!({"children": children})
    }

    #[tokio::test]
    async fn test_navigate_trash_hits_prefixed_path() {
        let (mock, client) = client();
        mock.push_ok(listing(&[("old.txt", 1)]));

        let mut browser = FileBrowser::new("alice", Namespace::Trash);
        assert!(navigate(&mut browser, &client, "/docs").await.is_none());

        let requests = mock.requests();
        assert_eq!(requests[0].query_value("path"), Some("/.Trash/docs"));
        assert_eq!(requests[0].query_value("username"), Some("alice"));
        assert_eq!(browser.current_path(), "/docs");
        assert_eq!(browser.entries()[0].name, "old.txt");
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_calls() {
        let (mock, client) = client();
        mock.push_ok(listing(&[("a.txt", 1)]));

        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        navigate(&mut browser, &client, "/").await;
        assert!(browser.request_batch_action().is_err());
        assert!(confirm_batch(&mut browser, &client).await.is_empty());
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_last_entry_refreshes_root() {
        let (mock, client) = client();
        mock.push_ok(listing(&[("only.txt", 1)]));
        mock.push_ok(json!(1));
        mock.push_ok(listing(&[("docs", 2)]));

        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        navigate(&mut browser, &client, "/docs").await;
        browser.select(["only.txt"]);
        browser.request_batch_action().unwrap();

        let notices = confirm_batch(&mut browser, &client).await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);

        let requests = mock.requests();
        assert_eq!(requests[1].path, "/api/user/moveToTrash");
        let body: serde_json::Value = serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"username": "alice", "paths": ["/docs/only.txt"]}));
        assert_eq!(requests[2].query_value("path"), Some("/"));
        assert_eq!(browser.current_path(), "/");
        assert!(browser.selection().is_empty());
    }

    #[tokio::test]
    async fn test_restore_refreshes_current_path() {
        let (mock, client) = client();
        mock.push_ok(listing(&[("a", 1), ("b", 1)]));
        mock.push_ok(json!(1));
        mock.push_ok(listing(&[("b", 1)]));

        let mut browser = FileBrowser::new("alice", Namespace::Trash);
        navigate(&mut browser, &client, "/x").await;
        browser.select(["a"]);
        browser.request_batch_action().unwrap();
        confirm_batch(&mut browser, &client).await;

        let requests = mock.requests();
        assert_eq!(requests[1].path, "/api/user/trash/resume");
        assert_eq!(requests[2].query_value("path"), Some("/.Trash/x"));
        assert_eq!(browser.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_batch_keeps_dialog_open() {
        let (mock, client) = client();
        mock.push_ok(listing(&[("a", 1), ("b", 1)]));
        mock.push_rejected(500, "disk busy");

        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        navigate(&mut browser, &client, "/").await;
        browser.select(["a"]);
        browser.request_batch_action().unwrap();

        let notices = confirm_batch(&mut browser, &client).await;
        assert_eq!(notices, vec![Notice::error("Delete failed: disk busy")]);
        assert!(matches!(browser.phase(), Phase::Confirming(_)));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_replica_change_does_not_refresh() {
        let (mock, client) = client();
        mock.push_ok(listing(&[("a", 1)]));
        mock.push_ok(json!(null));

        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        navigate(&mut browser, &client, "/").await;
        browser.request_replica_edit("a");
        browser.set_replica_value(2);

        let notice = confirm_replica(&mut browser, &client).await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].query_value("replicaNum"), Some("2"));
        assert_eq!(requests[1].query_value("path"), Some("/a"));
    }

    #[tokio::test]
    async fn test_locate_caches_empty_result() {
        let (mock, client) = client();
        mock.push_ok(listing(&[("a", 1)]));
        mock.push_ok(json!([]));

        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        navigate(&mut browser, &client, "/").await;
        assert!(locate(&mut browser, &client, "a").await.is_none());
        assert_eq!(browser.storage_lookup("a"), StorageLookup::Fetched(&[]));

        // Cached: no second call.
        assert!(locate(&mut browser, &client, "a").await.is_none());
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_listing_timeout_is_silent() {
        let (mock, client) = client();
        mock.push_error(crate::error::TransportError::Timeout);

        let mut browser = FileBrowser::new("alice", Namespace::Normal);
        assert!(navigate(&mut browser, &client, "/").await.is_none());
        assert!(browser.is_loading());
    }
}
