//! `dfs-console-cli` - DFS administration from the command line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use dfs_console_cli::commands::{self, Format};
use dfs_console_cli::{CliClient, FileTokenStore, ReqwestTransport};
use dfs_console_core::api::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_MS};
use dfs_console_core::browser::{MAX_REPLICAS, MIN_REPLICAS};
use dfs_console_core::{AdminClient, ClientConfig, Namespace, PendingAction, Session, User};

#[derive(Parser)]
#[command(name = "dfs-console-cli")]
#[command(about = "Administer a distributed file system through its NameNode")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// NameNode REST API base URL.
    #[arg(long, env = "DFS_CONSOLE_API", default_value = DEFAULT_API_BASE)]
    api: String,

    /// File server base URL (defaults to the API URL).
    #[arg(long, env = "DFS_CONSOLE_FILE_SERVER")]
    file_server: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, env = "DFS_CONSOLE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u32,

    /// Session file (defaults to the platform config directory).
    #[arg(long, env = "DFS_CONSOLE_SESSION")]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session.
    Login {
        username: String,

        /// Password (prompted when omitted).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the session.
    Logout,

    /// Show the logged in user.
    Whoami,

    /// List a directory of a user's tree.
    Ls {
        /// Owner of the tree.
        #[arg(short, long)]
        user: String,

        /// Directory to list.
        #[arg(default_value = "/")]
        path: String,

        /// List the user's trash instead.
        #[arg(long)]
        trash: bool,
    },

    /// Move entries to the trash.
    Rm {
        #[arg(short, long)]
        user: String,

        /// Absolute paths, all in one directory.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Restore entries from the trash.
    Restore {
        #[arg(short, long)]
        user: String,

        /// Paths as shown by `ls --trash`, all in one directory.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the direct download link of a file.
    Url {
        #[arg(short, long)]
        user: String,

        path: String,
    },

    /// Show the DataNodes holding a file.
    Locate {
        #[arg(short, long)]
        user: String,

        path: String,
    },

    /// Change the replica count of a file.
    Replicas {
        #[arg(short, long)]
        user: String,

        path: String,

        #[arg(value_parser = clap::value_parser!(u8).range(i64::from(MIN_REPLICAS)..=i64::from(MAX_REPLICAS)))]
        count: u8,
    },

    /// List users.
    Users,

    /// Manage one user.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show DataNode and NameNode status.
    Nodes,
}

#[derive(Subcommand)]
enum UserAction {
    /// Show a user.
    Show { username: String },

    /// Create a user.
    Add {
        username: String,

        #[arg(short, long)]
        secret: String,

        /// DataNode hostnames the user may store on.
        #[arg(short, long, value_delimiter = ',')]
        nodes: Vec<String>,
    },

    /// Change a user's secret and DataNode quota.
    Edit {
        username: String,

        #[arg(short, long)]
        secret: String,

        #[arg(short, long, value_delimiter = ',')]
        nodes: Vec<String>,
    },

    /// Delete a user.
    Delete {
        username: String,

        #[arg(short, long)]
        yes: bool,
    },
}

fn build_client(cli: &Cli) -> Result<CliClient> {
    let config = ClientConfig {
        api_base: cli.api.clone(),
        file_server_base: cli.file_server.clone().unwrap_or_else(|| cli.api.clone()),
        timeout_ms: cli.timeout_ms,
    };
    let session_path = match &cli.session {
        Some(path) => path.clone(),
        None => FileTokenStore::default_path()
            .ok_or_else(|| anyhow!("no config directory; pass --session"))?,
    };
    log::debug!("session file {}", session_path.display());

    let transport = ReqwestTransport::new(config).context("Failed to build HTTP client")?;
    Ok(AdminClient::new(transport, Session::new(FileTokenStore::new(session_path))))
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` declines.
fn prompt_yes(question: &str) -> bool {
    eprint!("{} [y/N] ", question);
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn confirm_batch(yes: bool) -> impl FnOnce(&PendingAction) -> bool {
    move |pending| {
        if yes {
            return true;
        }
        for path in &pending.paths {
            eprintln!("  {}", path);
        }
        prompt_yes(&format!("{} these entries?", pending.kind.label()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let client = build_client(&cli)?;
    let format = if cli.json { Format::Json } else { Format::Table };
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
            };
            commands::login(&client, &mut out, &username, &password).await
        }
        Commands::Logout => commands::logout(&client, &mut out),
        Commands::Whoami => commands::whoami(&client, &mut out),
        Commands::Ls { user, path, trash } => {
            let namespace = Namespace::from_trash_flag(trash);
            commands::list(&client, &mut out, &user, namespace, &path, format).await
        }
        Commands::Rm { user, paths, yes } => {
            commands::batch(&client, &mut out, &user, Namespace::Normal, &paths, confirm_batch(yes)).await
        }
        Commands::Restore { user, paths, yes } => {
            commands::batch(&client, &mut out, &user, Namespace::Trash, &paths, confirm_batch(yes)).await
        }
        Commands::Url { user, path } => {
            commands::download_url(client.transport().config(), &mut out, &user, &path)
        }
        Commands::Locate { user, path } => commands::locate(&client, &mut out, &user, &path).await,
        Commands::Replicas { user, path, count } => {
            commands::set_replicas(&client, &mut out, &user, &path, count).await
        }
        Commands::Users => commands::list_users(&client, &mut out, format).await,
        Commands::User { action } => match action {
            UserAction::Show { username } => commands::show_user(&client, &mut out, &username, format).await,
            UserAction::Add { username, secret, nodes } => {
                commands::save_user(&client, &mut out, &User::new(username, secret, nodes), true).await
            }
            UserAction::Edit { username, secret, nodes } => {
                commands::save_user(&client, &mut out, &User::new(username, secret, nodes), false).await
            }
            UserAction::Delete { username, yes } => {
                if !yes && !prompt_yes(&format!("Delete user {}?", username)) {
                    writeln!(out, "Aborted")?;
                    return Ok(());
                }
                commands::delete_user(&client, &mut out, &username).await
            }
        },
        Commands::Nodes => commands::nodes(&client, &mut out, format).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_replica_count_is_bounded() {
        let parse = |count: &str| {
            Cli::try_parse_from(["dfs-console-cli", "replicas", "-u", "alice", "/a.txt", count])
        };
        assert!(parse("0").is_err());
        assert!(parse("6").is_err());
        assert!(matches!(
            parse("3").map(|cli| cli.command),
            Ok(Commands::Replicas { count: 3, .. })
        ));
    }

    #[test]
    fn test_user_nodes_split_on_commas() {
        let cli = Cli::try_parse_from([
            "dfs-console-cli", "user", "add", "bob", "-s", "pw", "-n", "dn1,dn2",
        ])
        .unwrap();
        match cli.command {
            Commands::User {
                action: UserAction::Add { nodes, .. },
            } => assert_eq!(nodes, vec!["dn1", "dn2"]),
            _ => panic!("expected user add"),
        }
    }
}
