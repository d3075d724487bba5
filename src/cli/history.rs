use std::path::Path;

use comfy_table::{Cell, Table};

use crate::cli::open_existing;
use crate::db::list_loads;
use crate::error::Result;

pub fn run(db_path: &Path) -> Result<()> {
    let conn = open_existing(db_path)?;
    let loads = list_loads(&conn)?;

    if loads.is_empty() {
        println!("No loads recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Loaded", "File", "Read", "Inserted", "Dropped", "Skipped", "Dates", "Checksum"]);
    for l in &loads {
        let dates = match (&l.date_range_start, &l.date_range_end) {
            (Some(start), Some(end)) => format!("{start} -> {end}"),
            _ => String::new(),
        };
        let checksum = l.checksum.as_deref().map(|c| &c[..c.len().min(12)]).unwrap_or("");
        table.add_row(vec![
            Cell::new(l.loaded_at.as_deref().unwrap_or("")),
            Cell::new(&l.filename),
            Cell::new(l.rows_read),
            Cell::new(l.inserted),
            Cell::new(l.dropped),
            Cell::new(l.skipped),
            Cell::new(dates),
            Cell::new(checksum),
        ]);
    }
    println!("Load History\n{table}");
    Ok(())
}
