use std::path::Path;

use crate::cleaner::TracingLog;
use crate::cli::ensure_parent_dir;
use crate::db::{get_connection, init_db, insert_transactions, record_load, LoadRecord};
use crate::error::Result;
use crate::logging::init_logger;
use crate::reader::{file_checksum, read_and_clean_csv};
use crate::settings::expand_path;

pub fn run(db_path: &Path, csv: &str, log_file: Option<&str>, verbose: bool) -> Result<()> {
    let log_path = log_file.map(expand_path);
    init_logger(log_path.as_deref(), verbose)?;

    let csv_path = expand_path(csv);
    ensure_parent_dir(db_path)?;
    let mut conn = get_connection(db_path)?;
    init_db(&conn)?;

    tracing::info!("Loading {} into {}", csv_path.display(), db_path.display());
    let checksum = file_checksum(&csv_path)?;
    let (outcome, rows_read) = read_and_clean_csv(&csv_path, &TracingLog)?;
    let result = insert_transactions(&mut conn, &outcome.records)?;

    let dates = outcome.records.iter().map(|r| r.transaction_date.as_str());
    record_load(
        &conn,
        &LoadRecord {
            filename: csv_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string(),
            checksum: Some(checksum),
            loaded_at: None,
            rows_read: rows_read as i64,
            inserted: result.inserted as i64,
            dropped: outcome.dropped as i64,
            skipped: result.skipped as i64,
            date_range_start: dates.clone().min().map(str::to_string),
            date_range_end: dates.max().map(str::to_string),
        },
    )?;
    tracing::info!(
        "Load finished: {rows_read} read, {} inserted, {} dropped, {} skipped",
        result.inserted,
        outcome.dropped,
        result.skipped
    );

    println!("Loaded CSV: {}", csv_path.display());
    println!(" - cleaned rows inserted: {}", result.inserted);
    println!(" - dropped during cleaning: {}", outcome.dropped);
    println!(" - skipped at insert (PK conflicts/invalid): {}", result.skipped);
    Ok(())
}
