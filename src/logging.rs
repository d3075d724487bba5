use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::error::{Result, TxnError};

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the global subscriber. Logs go to stderr unless `log_file` is
/// given, in which case they are appended there without colour.
pub fn init_logger(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let level = level_for(verbose);
    let layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(level)
                .boxed()
        }
        None => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(level)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TxnError::Other(format!("Failed to set up logging: {e}")))
}
