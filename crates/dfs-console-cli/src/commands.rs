//! Command implementations.
//!
//! Every command runs against a generic [`AdminClient`] and writes to a
//! generic sink, so tests drive them with a scripted transport and a
//! `Vec<u8>`. File commands go through the same [`FileBrowser`] state
//! machine as the web console.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use dfs_console_core::browser::driver;
use dfs_console_core::path;
use dfs_console_core::{
    AdminClient, ClientConfig, DataNode, DirEntry, FileBrowser, NameNode, Namespace, Notice, PendingAction,
    Phase, StorageLookup, TokenStore, Transport, User,
};
use serde::Serialize;

/// Output format shared by every listing command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
}

fn write_json<W: Write, V: Serialize + ?Sized>(out: &mut W, value: &V) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_notices<W: Write>(out: &mut W, notices: &[Notice]) -> Result<()> {
    for notice in notices {
        writeln!(out, "{}", notice)?;
    }
    Ok(())
}

// =============================================================================
// Session
// =============================================================================

pub async fn login<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    username: &str,
    password: &str,
) -> Result<()> {
    client
        .login(username, password)
        .await
        .with_context(|| format!("login as {} failed", username))?;
    writeln!(out, "Logged in as {}", username)?;
    Ok(())
}

pub fn logout<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
) -> Result<()> {
    client.logout().context("failed to clear the session")?;
    writeln!(out, "Logged out")?;
    Ok(())
}

pub fn whoami<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
) -> Result<()> {
    match client.session().token() {
        Some(user) => writeln!(out, "{}", user)?,
        None => writeln!(out, "Not logged in")?,
    }
    Ok(())
}

// =============================================================================
// Files
// =============================================================================

/// Split an absolute path into its directory and entry name.
fn split_path(target: &str) -> Result<(String, String)> {
    let normalized = path::normalize(target);
    let name = path::segments(&normalized)
        .last()
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("{} names no entry", target))?;
    Ok((path::parent(&normalized), name))
}

/// Open a browser on `dir` and wait for its listing.
async fn open_dir<T: Transport, S: TokenStore>(
    client: &AdminClient<T, S>,
    username: &str,
    namespace: Namespace,
    dir: &str,
) -> Result<FileBrowser> {
    let mut browser = FileBrowser::new(username, namespace);
    let request = browser.navigate(dir);
    let entries = driver::fetch_listing(client, &request)
        .await
        .with_context(|| format!("failed to list {}", request.display_path))?;
    browser.apply_listing(&request, Ok(entries));
    Ok(browser)
}

fn require_entry<'a>(browser: &'a FileBrowser, name: &str) -> Result<&'a DirEntry> {
    browser
        .entry(name)
        .ok_or_else(|| anyhow!("no such entry: {}", browser.entry_path(name)))
}

fn write_listing<W: Write>(out: &mut W, entries: &[DirEntry]) -> Result<()> {
    for entry in entries {
        let kind = if entry.is_dir() { 'd' } else { '-' };
        writeln!(out, "{} {:>10}  {}", kind, entry.display_size(), entry.name)?;
    }
    Ok(())
}

/// List `dir` of `username`, optionally inside the trash.
pub async fn list<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    username: &str,
    namespace: Namespace,
    dir: &str,
    format: Format,
) -> Result<()> {
    let browser = open_dir(client, username, namespace, dir).await?;
    match format {
        Format::Json => write_json(out, browser.entries()),
        Format::Table => write_listing(out, browser.entries()),
    }
}

/// Move `targets` to the trash, or restore them from it.
///
/// All targets must live in one directory. `confirm` sees the staged action
/// and decides whether it runs.
pub async fn batch<T, S, W, F>(
    client: &AdminClient<T, S>,
    out: &mut W,
    username: &str,
    namespace: Namespace,
    targets: &[String],
    confirm: F,
) -> Result<()>
where
    T: Transport,
    S: TokenStore,
    W: Write,
    F: FnOnce(&PendingAction) -> bool,
{
    let mut dir = None;
    let mut names = Vec::with_capacity(targets.len());
    for target in targets {
        let (parent, name) = split_path(target)?;
        match &dir {
            None => dir = Some(parent),
            Some(d) if *d != parent => bail!("all paths must share one directory ({} vs {})", d, parent),
            Some(_) => {}
        }
        names.push(name);
    }
    let dir = dir.unwrap_or_else(|| path::ROOT.to_string());

    let mut browser = open_dir(client, username, namespace, &dir).await?;
    for name in &names {
        require_entry(&browser, name)?;
    }
    browser.select(names);
    browser
        .request_batch_action()
        .map_err(|notice| anyhow!(notice.message))?;

    let Some(pending) = browser.pending().cloned() else {
        bail!("nothing staged");
    };
    if !confirm(&pending) {
        browser.cancel_batch();
        writeln!(out, "Aborted")?;
        return Ok(());
    }

    let notices = driver::confirm_batch(&mut browser, client).await;
    if let Some(error) = notices.iter().find(|n| n.is_error()) {
        bail!(error.message.clone());
    }
    if matches!(browser.phase(), Phase::Confirming(_)) {
        bail!("{} failed, see the log for details", pending.kind.label());
    }
    print_notices(out, &notices)
}

/// Print the direct download link of `target`. No request is made.
pub fn download_url<W: Write>(
    config: &ClientConfig,
    out: &mut W,
    username: &str,
    target: &str,
) -> Result<()> {
    let (dir, name) = split_path(target)?;
    writeln!(out, "{}", config.download_url(username, &dir, &name))?;
    Ok(())
}

/// Print the DataNodes holding replicas of `target`.
pub async fn locate<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    username: &str,
    target: &str,
) -> Result<()> {
    let (dir, name) = split_path(target)?;
    let mut browser = open_dir(client, username, Namespace::Normal, &dir).await?;
    if require_entry(&browser, &name)?.is_dir() {
        bail!("{} is a directory", browser.entry_path(&name));
    }

    if let Some(notice) = driver::locate(&mut browser, client, &name).await {
        bail!(notice.message);
    }
    match browser.storage_lookup(&name) {
        StorageLookup::Fetched([]) => writeln!(out, "No replicas")?,
        StorageLookup::Fetched(hosts) => {
            for host in hosts {
                writeln!(out, "{}", host)?;
            }
        }
        StorageLookup::Unfetched | StorageLookup::Loading => {
            bail!("storage lookup for {} failed, see the log for details", browser.entry_path(&name))
        }
    }
    Ok(())
}

/// Request a new replica count for `target`.
pub async fn set_replicas<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    username: &str,
    target: &str,
    replicas: u8,
) -> Result<()> {
    let (dir, name) = split_path(target)?;
    let mut browser = open_dir(client, username, Namespace::Normal, &dir).await?;
    require_entry(&browser, &name)?;
    if !browser.request_replica_edit(&name) {
        bail!("{} is a directory", browser.entry_path(&name));
    }
    browser.set_replica_value(replicas);

    match driver::confirm_replica(&mut browser, client).await {
        Some(notice) if notice.is_error() => bail!(notice.message),
        Some(notice) => print_notices(out, &[notice]),
        None => bail!("replica change for {} failed, see the log for details", target),
    }
}

// =============================================================================
// Users
// =============================================================================

pub async fn list_users<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    format: Format,
) -> Result<()> {
    let users = client.list_users().await.context("failed to list users")?;
    match format {
        Format::Json => write_json(out, &users),
        Format::Table => {
            for user in &users {
                write_user_row(out, user)?;
            }
            Ok(())
        }
    }
}

fn write_user_row<W: Write>(out: &mut W, user: &User) -> Result<()> {
    writeln!(
        out,
        "{:<16} {:>6} files {:>12}  {}",
        user.username,
        user.storage_info.file_count,
        user.display_storage_size(),
        user.storage_info.data_nodes.join(",")
    )?;
    Ok(())
}

pub async fn show_user<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    username: &str,
    format: Format,
) -> Result<()> {
    let user = client
        .get_user(username)
        .await
        .with_context(|| format!("failed to fetch user {}", username))?
        .ok_or_else(|| anyhow!("no such user: {}", username))?;
    match format {
        Format::Json => write_json(out, &user),
        Format::Table => write_user_row(out, &user),
    }
}

/// Create a user, or update the secret and quota of an existing one.
pub async fn save_user<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    user: &User,
    create: bool,
) -> Result<()> {
    if user.username.trim().is_empty() {
        bail!("username must not be empty");
    }
    if create {
        client
            .add_user(user)
            .await
            .with_context(|| format!("failed to create user {}", user.username))?;
        writeln!(out, "Created user {}", user.username)?;
    } else {
        client
            .modify_user(user)
            .await
            .with_context(|| format!("failed to update user {}", user.username))?;
        writeln!(out, "Updated user {}", user.username)?;
    }
    Ok(())
}

pub async fn delete_user<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    username: &str,
) -> Result<()> {
    client
        .delete_user(username)
        .await
        .with_context(|| format!("failed to delete user {}", username))?;
    writeln!(out, "Deleted user {}", username)?;
    Ok(())
}

// =============================================================================
// Nodes
// =============================================================================

#[derive(Serialize)]
struct Cluster {
    datanodes: Vec<DataNode>,
    namenodes: Vec<NameNode>,
}

fn or_dash<V: ToString>(value: &Option<V>) -> String {
    value.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
}

pub async fn nodes<T: Transport, S: TokenStore, W: Write>(
    client: &AdminClient<T, S>,
    out: &mut W,
    format: Format,
) -> Result<()> {
    let datanodes = client.data_nodes().await.context("failed to list DataNodes")?;
    let namenodes = client.name_nodes().await.context("failed to list NameNodes")?;
    let cluster = Cluster {
        datanodes,
        namenodes,
    };

    if format == Format::Json {
        return write_json(out, &cluster);
    }
    writeln!(out, "DataNodes")?;
    for node in &cluster.datanodes {
        writeln!(
            out,
            "  {:>3} {:<20} {:<8} {:>6}  {}  {}",
            or_dash(&node.node_id),
            node.hostname,
            or_dash(&node.status),
            or_dash(&node.use_percent),
            node.usage_summary(),
            or_dash(&node.latest_heartbeat_time)
        )?;
    }
    writeln!(out, "NameNodes")?;
    for node in &cluster.namenodes {
        writeln!(
            out,
            "  {:>3} {:<20} http {:<6} nio {:<6} {}",
            or_dash(&node.node_id),
            node.hostname,
            or_dash(&node.http_port),
            or_dash(&node.nio_port),
            or_dash(&node.backup_node_info)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dfs_console_core::api::mock::MockTransport;
    use dfs_console_core::{BatchKind, MemoryTokenStore, Method, Session, TransportError};
    use serde_json::json;

    use super::*;

    fn client() -> (MockTransport, AdminClient<MockTransport, MemoryTokenStore>) {
        let transport = MockTransport::new();
        let session = Session::new(MemoryTokenStore::with_token("admin"));
        (transport.clone(), AdminClient::new(transport, session))
    }

    fn listing(children: serde_json::Value) -> serde_json::Value {
        json!({ "children": children })
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_login_reports_user_and_persists_session() {
        let transport = MockTransport::new();
        let client = AdminClient::new(transport.clone(), Session::new(MemoryTokenStore::new()));
        transport.push_ok(json!(null));

        let mut out = Vec::new();
        login(&client, &mut out, "root", "secret").await.unwrap();

        assert_eq!(text(out), "Logged in as root\n");
        assert_eq!(client.session().token(), Some("root".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_login_surfaces_server_message() {
        let transport = MockTransport::new();
        let client = AdminClient::new(transport.clone(), Session::new(MemoryTokenStore::new()));
        transport.push_rejected(1, "wrong password");

        let err = login(&client, &mut Vec::new(), "root", "nope").await.unwrap_err();
        assert!(format!("{:#}", err).contains("wrong password"));
        assert!(!client.session().is_logged_in());
    }

    #[test]
    fn test_logout_then_whoami() {
        let (_, client) = client();
        let mut out = Vec::new();
        whoami(&client, &mut out).unwrap();
        logout(&client, &mut out).unwrap();
        whoami(&client, &mut out).unwrap();
        assert_eq!(text(out), "admin\nLogged out\nNot logged in\n");
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/a.txt").unwrap(), ("/".to_string(), "a.txt".to_string()));
        assert_eq!(split_path("docs//b/").unwrap(), ("/docs".to_string(), "b".to_string()));
        assert!(split_path("/").is_err());
    }

    #[tokio::test]
    async fn test_list_table_marks_directories() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([
            {"path": "docs", "type": 2},
            {"path": "a.txt", "type": 1, "fileSize": "1.00 KB"}
        ])));

        let mut out = Vec::new();
        list(&client, &mut out, "alice", Namespace::Normal, "/", Format::Table)
            .await
            .unwrap();

        let out = text(out);
        assert!(out.contains("d         --  docs"));
        assert!(out.contains("-    1.00 KB  a.txt"));
        assert_eq!(transport.requests()[0].query_value("path"), Some("/"));
    }

    #[tokio::test]
    async fn test_list_trash_uses_trash_prefix() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([])));

        list(&client, &mut Vec::new(), "alice", Namespace::Trash, "/docs", Format::Json)
            .await
            .unwrap();

        assert_eq!(transport.requests()[0].query_value("path"), Some("/.Trash/docs"));
    }

    #[tokio::test]
    async fn test_list_transport_failure_is_an_error() {
        let (transport, client) = client();
        transport.push_error(TransportError::Timeout);

        let err = list(&client, &mut Vec::new(), "alice", Namespace::Normal, "/", Format::Table)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to list /"));
    }

    #[tokio::test]
    async fn test_rm_confirms_then_trashes_and_refreshes() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([
            {"path": "a.txt", "type": 1},
            {"path": "b.txt", "type": 1}
        ])));
        transport.push_ok(json!(1));
        transport.push_ok(listing(json!([{"path": "b.txt", "type": 1}])));

        let mut seen = None;
        let mut out = Vec::new();
        batch(
            &client,
            &mut out,
            "alice",
            Namespace::Normal,
            &["/docs/a.txt".to_string()],
            |pending| {
                seen = Some(pending.clone());
                true
            },
        )
        .await
        .unwrap();

        let pending = seen.unwrap();
        assert_eq!(pending.kind, BatchKind::MoveToTrash);
        assert_eq!(pending.paths, vec!["/docs/a.txt".to_string()]);
        assert_eq!(text(out), "Moved 1 item(s) to trash\n");

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, Method::Put);
        assert_eq!(requests[1].path, "/api/user/moveToTrash");
        assert_eq!(requests[2].query_value("path"), Some("/docs"));
    }

    #[tokio::test]
    async fn test_rm_declined_sends_nothing_after_listing() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "a.txt", "type": 1}])));

        let mut out = Vec::new();
        batch(&client, &mut out, "alice", Namespace::Normal, &["/a.txt".to_string()], |_| false)
            .await
            .unwrap();

        assert_eq!(text(out), "Aborted\n");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_rm_unknown_entry_fails_before_any_change() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "a.txt", "type": 1}])));

        let err = batch(&client, &mut Vec::new(), "alice", Namespace::Normal, &["/zzz".to_string()], |_| true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no such entry: /zzz");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_rm_rejects_mixed_directories() {
        let (transport, client) = client();
        let targets = ["/a/x".to_string(), "/b/y".to_string()];

        let err = batch(&client, &mut Vec::new(), "alice", Namespace::Normal, &targets, |_| true)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("all paths must share one directory"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_restore_rejection_is_reported() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "a.txt", "type": 1}])));
        transport.push_rejected(2, "target exists");

        let err = batch(&client, &mut Vec::new(), "alice", Namespace::Trash, &["/a.txt".to_string()], |_| true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Restore failed: target exists");
        assert_eq!(transport.requests()[1].path, "/api/user/trash/resume");
    }

    #[test]
    fn test_download_url_keeps_file_server_layout() {
        let config = ClientConfig {
            file_server_base: "http://files:8081/".to_string(),
            ..ClientConfig::default()
        };
        let mut out = Vec::new();
        download_url(&config, &mut out, "alice", "/docs/a.txt").unwrap();
        download_url(&config, &mut out, "alice", "/b.txt").unwrap();
        assert_eq!(
            text(out),
            "http://files:8081/alice/docs/a.txt\nhttp://files:8081/alice//b.txt\n"
        );
    }

    #[tokio::test]
    async fn test_locate_prints_hosts() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "a.txt", "type": 1}])));
        transport.push_ok(json!([{"hostname": "dn1"}, {"hostname": "dn2"}]));

        let mut out = Vec::new();
        locate(&client, &mut out, "alice", "/a.txt").await.unwrap();
        assert_eq!(text(out), "dn1\ndn2\n");
    }

    #[tokio::test]
    async fn test_locate_empty_is_not_an_error() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "a.txt", "type": 1}])));
        transport.push_ok(json!(null));

        let mut out = Vec::new();
        locate(&client, &mut out, "alice", "/a.txt").await.unwrap();
        assert_eq!(text(out), "No replicas\n");
    }

    #[tokio::test]
    async fn test_locate_directory_is_refused() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "docs", "type": 2}])));

        let err = locate(&client, &mut Vec::new(), "alice", "/docs").await.unwrap_err();
        assert_eq!(err.to_string(), "/docs is a directory");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_set_replicas_sends_count() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "a.txt", "type": 1}])));
        transport.push_ok(json!(null));

        let mut out = Vec::new();
        set_replicas(&client, &mut out, "alice", "/a.txt", 3).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[1].path, "/api/nodes/changeReplicaNum");
        assert_eq!(requests[1].query_value("replicaNum"), Some("3"));
        assert!(text(out).starts_with("Replica count of /a.txt set to 3"));
    }

    #[tokio::test]
    async fn test_set_replicas_transport_failure_is_an_error() {
        let (transport, client) = client();
        transport.push_ok(listing(json!([{"path": "a.txt", "type": 1}])));
        transport.push_error(TransportError::Network("refused".to_string()));

        let result = set_replicas(&client, &mut Vec::new(), "alice", "/a.txt", 2).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_users_table() {
        let (transport, client) = client();
        transport.push_ok(json!([{
            "username": "alice",
            "storageInfo": {"dataNodes": ["dn1", "dn2"], "fileCount": 4, "storageSize": 2048}
        }]));

        let mut out = Vec::new();
        list_users(&client, &mut out, Format::Table).await.unwrap();

        let out = text(out);
        assert!(out.starts_with("alice"));
        assert!(out.contains("4 files"));
        assert!(out.trim_end().ends_with("dn1,dn2"));
    }

    #[tokio::test]
    async fn test_show_missing_user() {
        let (transport, client) = client();
        transport.push_ok(json!(null));

        let err = show_user(&client, &mut Vec::new(), "ghost", Format::Table)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no such user: ghost");
    }

    #[tokio::test]
    async fn test_save_user_create_and_update() {
        let (transport, client) = client();
        transport.push_ok(json!(null));
        transport.push_ok(json!(null));
        let user = User::new("bob", "s3cret", vec!["dn1".to_string()]);

        let mut out = Vec::new();
        save_user(&client, &mut out, &user, true).await.unwrap();
        save_user(&client, &mut out, &user, false).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[1].method, Method::Put);
        assert_eq!(text(out), "Created user bob\nUpdated user bob\n");
    }

    #[tokio::test]
    async fn test_save_user_requires_name() {
        let (transport, client) = client();
        let user = User::new("  ", "s3cret", Vec::new());

        assert!(save_user(&client, &mut Vec::new(), &user, true).await.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (transport, client) = client();
        transport.push_ok(json!(null));

        let mut out = Vec::new();
        delete_user(&client, &mut out, "bob").await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path, "/api/user/bob");
        assert_eq!(text(out), "Deleted user bob\n");
    }

    #[tokio::test]
    async fn test_nodes_table_tolerates_missing_fields() {
        let (transport, client) = client();
        transport.push_ok(json!([{"hostname": "dn1", "status": "UP", "usePercent": "40%"}]));
        transport.push_ok(json!([{"nodeId": 1, "hostname": "nn1", "httpPort": 8081}]));

        let mut out = Vec::new();
        nodes(&client, &mut out, Format::Table).await.unwrap();

        let out = text(out);
        assert!(out.contains("dn1"));
        assert!(out.contains("UP"));
        assert!(out.contains("nn1"));
        assert!(out.contains("http 8081"));
    }

    #[tokio::test]
    async fn test_commands_need_a_session() {
        let transport = MockTransport::new();
        let client = AdminClient::new(transport.clone(), Session::new(MemoryTokenStore::new()));

        let err = nodes(&client, &mut Vec::new(), Format::Json).await.unwrap_err();
        assert!(format!("{:#}", err).contains("not logged in"));
        assert_eq!(transport.request_count(), 0);
    }
}
