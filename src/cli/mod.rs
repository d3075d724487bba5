pub mod history;
pub mod init_db;
pub mod load;
pub mod summary;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::db::get_connection;
use crate::error::{Result, TxnError};

#[derive(Parser)]
#[command(name = "txnproc", about = "CSV -> cleaned data -> SQLite")]
pub struct Cli {
    /// Path to SQLite database (default: from ~/.config/txnproc/settings.json)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database schema.
    InitDb,
    /// Load data from CSV into DB (with cleaning).
    Load {
        /// Path to input CSV
        #[arg(long)]
        csv: String,
        /// Optional log file path
        #[arg(long = "log-file")]
        log_file: Option<String>,
        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show summary stats.
    Summary,
    /// List previous loads.
    History,
}

/// Open an existing database; reporting commands never create one.
pub(crate) fn open_existing(db_path: &Path) -> Result<rusqlite::Connection> {
    if !db_path.exists() {
        return Err(TxnError::Other(format!(
            "No database found at {}\nRun `txnproc --db {} init-db` to create one.",
            db_path.display(),
            db_path.display()
        )));
    }
    get_connection(db_path)
}

pub(crate) fn ensure_parent_dir(db_path: &Path) -> Result<()> {
    if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
