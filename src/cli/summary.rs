use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::open_existing;
use crate::db;
use crate::error::Result;
use crate::fmt::amount;

pub fn run(db_path: &Path) -> Result<()> {
    let conn = open_existing(db_path)?;
    let s = db::summary(&conn)?;

    println!("{}", "Summary".bold());
    println!("Total transactions: {}", s.total_transactions);

    if s.per_category.is_empty() {
        println!("No transactions stored.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Count", "Total", "Average"]);
    for row in &s.per_category {
        let label = if row.category == db::UNCATEGORIZED {
            Cell::new(row.category.as_str().dimmed())
        } else {
            Cell::new(&row.category)
        };
        table.add_row(vec![
            label,
            Cell::new(row.count),
            Cell::new(amount(row.total)),
            Cell::new(amount(row.average)),
        ]);
    }
    println!("Per-category totals and averages\n{table}");

    if let Some(range) = &s.date_range {
        println!("Date range: {} -> {}", range.start, range.end);
    }
    Ok(())
}
