//! Command line front end for the actions dashboard.
//!
//! Usage:
//!   actions-dashboard login --username admin@example.com --password secret1
//!   actions-dashboard list --page 2 --page-size 20 --search recycle
//!   actions-dashboard create --name Recycle --description "Sort the weekly trash" --color 1e3a5f
//!   actions-dashboard logout

use actions_dashboard::actions_store::{ActionsState, FetchOutcome};
use actions_dashboard::clients::StoreClient;
use actions_dashboard::config::Config;
use actions_dashboard::lifecycle::tracing::setup_tracing;
use actions_dashboard::lifecycle::{Dashboard, DashboardError};
use actions_dashboard::model::{ActionForm, Credentials, IconFile, PAGE_SIZE_OPTIONS};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "actions-dashboard")]
#[command(about = "Administer actions from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and keep the session token on disk
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// List one page of actions
    List {
        #[arg(long)]
        page: Option<u32>,
        /// One of 10, 20 or 50
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<u32>,
        /// Only show actions whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create an action
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
        /// Hex color, with or without the leading '#'
        #[arg(short, long, default_value = "#1e3a5f")]
        color: String,
        #[arg(long)]
        inactive: bool,
        /// Image file uploaded as the icon
        #[arg(long)]
        icon: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("Cannot read icon {path}: {source}")]
    Icon {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not logged in. Run `actions-dashboard login` first.")]
    NotLoggedIn,

    #[error("{0}")]
    Listing(String),
}

fn parse_page_size(raw: &str) -> Result<u32, String> {
    let size: u32 = raw.parse().map_err(|e| format!("{e}"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn read_icon(path: PathBuf) -> Result<IconFile, CliError> {
    let bytes = tokio::fs::read(&path).await.map_err(|source| CliError::Icon {
        path: path.clone(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "icon".to_string());
    Ok(IconFile {
        file_name,
        content_type: content_type(&path).to_string(),
        bytes,
    })
}

fn print_page(state: &ActionsState, search: Option<&str>) {
    let view = state.pagination();
    let items = state.filtered(search.unwrap_or_default());

    for action in &items {
        println!(
            "{:>6}  {:<10}  {:<30}  {}",
            action.id,
            action.status.label(),
            action.name,
            action.description
        );
    }
    println!(
        "Showing {}-{} of {} (page {}/{})",
        view.start_item,
        view.end_item,
        view.total_count,
        state.current_page,
        state.total_pages.max(1)
    );
}

async fn current_page(dashboard: &Dashboard) -> Result<ActionsState, CliError> {
    Ok(dashboard.actions.get().await.map_err(DashboardError::from)?)
}

async fn run(dashboard: &Dashboard, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let outcome = dashboard
                .login(Credentials::new(username, password))
                .await?;
            println!("Logged in.");
            if outcome == FetchOutcome::Applied {
                print_page(&current_page(dashboard).await?, None);
            }
        }
        Command::Logout => {
            dashboard.logout().await?;
            println!("Logged out.");
        }
        Command::Status => {
            let authenticated = dashboard
                .session
                .check_auth()
                .await
                .map_err(DashboardError::from)?;
            if authenticated {
                println!("Logged in.");
            } else {
                println!("Not logged in.");
            }
        }
        Command::List {
            page,
            page_size,
            search,
        } => {
            if !dashboard.session.is_authenticated() {
                return Err(CliError::NotLoggedIn);
            }
            let mut outcome = match page_size {
                Some(size) => dashboard
                    .actions
                    .set_page_size(size)
                    .await
                    .map_err(DashboardError::from)?,
                None => FetchOutcome::Applied,
            };
            if page_size.is_none() || page.is_some_and(|p| p > 1) {
                outcome = dashboard
                    .actions
                    .fetch_page(page, None)
                    .await
                    .map_err(DashboardError::from)?;
            }
            match outcome {
                FetchOutcome::Failed(message) => return Err(CliError::Listing(message)),
                _ => print_page(&current_page(dashboard).await?, search.as_deref()),
            }
        }
        Command::Create {
            name,
            description,
            color,
            inactive,
            icon,
        } => {
            if !dashboard.session.is_authenticated() {
                return Err(CliError::NotLoggedIn);
            }
            let mut form = ActionForm::new(name, description).with_color(color);
            if inactive {
                form = form.inactive();
            }
            if let Some(path) = icon {
                form = form.with_icon(read_icon(path).await?);
            }
            dashboard.create_action(form).await?;
            println!("Action created.");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(api = %config.api_url, "Starting");

    let dashboard = match Dashboard::new(&config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = run(&dashboard, cli.command).await;

    if let Err(e) = dashboard.shutdown().await {
        warn!(error = %e, "Shutdown failed");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
