// ⚙️ Configuration - CLI flags, data paths, logging
//
// Flags override environment variables, which override the platform
// data directory defaults.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::entities::{GameMode, Membership};

pub const DEFAULT_DB_FILE: &str = "tracker.db";
pub const DEFAULT_LOG_FILE: &str = "tracker.log";
const DEFAULT_LOG_FILTER: &str = "osrs_tracker=info";

#[derive(Debug, Parser)]
#[command(name = "osrs-tracker")]
#[command(about = "Completionist checklist tracker for Old School RuneScape accounts")]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "OSRS_TRACKER_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Log file used while the terminal UI is running
    #[arg(long, env = "OSRS_TRACKER_LOG", global = true)]
    pub log_file: Option<PathBuf>,

    /// Account to select on startup
    #[arg(long, global = true)]
    pub account: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive terminal UI (default)
    Tui,

    /// List accounts
    Accounts,

    /// Create an account
    AddAccount {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "members")]
        membership: Membership,

        #[arg(long, default_value = "main")]
        mode: GameMode,
    },

    /// Overall and per-category progress
    Status,

    /// Toggle one checklist item
    Toggle {
        item_id: String,
    },

    /// Show or change settings
    Settings {
        #[arg(long)]
        count_third_age: Option<bool>,
    },
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub account: Option<String>,
}

impl Config {
    pub fn resolve(cli: &Cli) -> Config {
        let data_dir = data_dir();
        Config {
            db_path: cli
                .db
                .clone()
                .unwrap_or_else(|| data_dir.join(DEFAULT_DB_FILE)),
            log_path: cli
                .log_file
                .clone()
                .unwrap_or_else(|| data_dir.join(DEFAULT_LOG_FILE)),
            account: cli.account.clone(),
        }
    }
}

/// Platform data directory, or the working directory when there is none
pub fn data_dir() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("com", "osrs-tracker", "osrs-tracker") {
        dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Log to stderr (CLI subcommands)
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a file so the terminal UI owns the screen
pub fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(())
}
