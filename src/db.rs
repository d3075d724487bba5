use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::CleanRecord;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL,
    transaction_date TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT
);

CREATE INDEX IF NOT EXISTS idx_transactions_user_date
    ON transactions(user_id, transaction_date);

CREATE INDEX IF NOT EXISTS idx_transactions_category
    ON transactions(category);

CREATE TABLE IF NOT EXISTS loads (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    checksum TEXT,
    loaded_at TEXT DEFAULT (datetime('now')),
    rows_read INTEGER NOT NULL,
    inserted INTEGER NOT NULL,
    dropped INTEGER NOT NULL,
    skipped INTEGER NOT NULL,
    date_range_start TEXT,
    date_range_end TEXT
);
";

/// Label for transactions stored without a category.
pub const UNCATEGORIZED: &str = "UNCATEGORIZED";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Insert
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
pub struct InsertResult {
    pub inserted: usize,
    /// Primary-key conflicts with earlier loads, plus rows SQLite refused.
    pub skipped: usize,
}

pub fn insert_transactions(conn: &mut Connection, records: &[CleanRecord]) -> Result<InsertResult> {
    let mut result = InsertResult::default();
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO transactions (transaction_id, user_id, transaction_date, amount, category) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for r in records {
            match stmt.execute(params![
                r.transaction_id,
                r.user_id,
                r.transaction_date,
                r.amount,
                r.category,
            ]) {
                Ok(0) => {
                    tracing::debug!("{}: already stored; skipped", r.transaction_id);
                    result.skipped += 1;
                }
                Ok(_) => result.inserted += 1,
                Err(e) => {
                    tracing::debug!("{}: insert failed ({e}); skipped", r.transaction_id);
                    result.skipped += 1;
                }
            }
        }
    }
    tx.commit()?;
    Ok(result)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub count: i64,
    pub total: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_transactions: i64,
    pub per_category: Vec<CategorySummary>,
    /// `None` when nothing is stored.
    pub date_range: Option<DateRange>,
}

pub fn summary(conn: &Connection) -> Result<Summary> {
    let total_transactions: i64 =
        conn.query_row("SELECT count(*) FROM transactions", [], |row| row.get(0))?;

    let mut stmt = conn.prepare(
        "SELECT COALESCE(category, ?1), COUNT(*), ROUND(SUM(amount), 2), ROUND(AVG(amount), 2) \
         FROM transactions GROUP BY category ORDER BY SUM(amount) DESC NULLS LAST",
    )?;
    let per_category = stmt
        .query_map([UNCATEGORIZED], |row| {
            Ok(CategorySummary {
                category: row.get(0)?,
                count: row.get(1)?,
                total: row.get(2)?,
                average: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let (start, end): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(transaction_date), MAX(transaction_date) FROM transactions",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let date_range = start.zip(end).map(|(start, end)| DateRange { start, end });

    Ok(Summary {
        total_transactions,
        per_category,
        date_range,
    })
}

// ---------------------------------------------------------------------------
// Load history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct LoadRecord {
    pub filename: String,
    pub checksum: Option<String>,
    /// Filled in by SQLite on insert.
    pub loaded_at: Option<String>,
    pub rows_read: i64,
    pub inserted: i64,
    pub dropped: i64,
    pub skipped: i64,
    pub date_range_start: Option<String>,
    pub date_range_end: Option<String>,
}

pub fn record_load(conn: &Connection, load: &LoadRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO loads (filename, checksum, rows_read, inserted, dropped, skipped, date_range_start, date_range_end) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            load.filename,
            load.checksum,
            load.rows_read,
            load.inserted,
            load.dropped,
            load.skipped,
            load.date_range_start,
            load.date_range_end,
        ],
    )?;
    Ok(())
}

/// Most recent first.
pub fn list_loads(conn: &Connection) -> Result<Vec<LoadRecord>> {
    let mut stmt = conn.prepare(
        "SELECT filename, checksum, loaded_at, rows_read, inserted, dropped, skipped, date_range_start, date_range_end \
         FROM loads ORDER BY id DESC",
    )?;
    let loads = stmt
        .query_map([], |row| {
            Ok(LoadRecord {
                filename: row.get(0)?,
                checksum: row.get(1)?,
                loaded_at: row.get(2)?,
                rows_read: row.get(3)?,
                inserted: row.get(4)?,
                dropped: row.get(5)?,
                skipped: row.get(6)?,
                date_range_start: row.get(7)?,
                date_range_end: row.get(8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(loads)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn rec(id: &str, date: &str, amount: f64, category: Option<&str>) -> CleanRecord {
        CleanRecord {
            transaction_id: id.to_string(),
            user_id: 1,
            transaction_date: date.to_string(),
            amount,
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["transactions", "loads"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_insert_skips_existing_ids() {
        let (_dir, mut conn) = test_db();
        let first = vec![rec("t1", "2024-01-02", 10.5, Some("food")), rec("t2", "2024-01-03", 4.0, None)];
        let r1 = insert_transactions(&mut conn, &first).unwrap();
        assert_eq!(r1, InsertResult { inserted: 2, skipped: 0 });

        let second = vec![rec("t2", "2024-02-01", 99.0, None), rec("t3", "2024-01-04", 1.0, None)];
        let r2 = insert_transactions(&mut conn, &second).unwrap();
        assert_eq!(r2, InsertResult { inserted: 1, skipped: 1 });

        // The original t2 is kept.
        let amount: f64 = conn
            .query_row("SELECT amount FROM transactions WHERE transaction_id = 't2'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(amount, 4.0);
    }

    #[test]
    fn test_reloading_same_records_is_idempotent() {
        let (_dir, mut conn) = test_db();
        let records = vec![rec("t1", "2024-01-02", 10.5, Some("food"))];
        insert_transactions(&mut conn, &records).unwrap();
        let again = insert_transactions(&mut conn, &records).unwrap();
        assert_eq!(again, InsertResult { inserted: 0, skipped: 1 });
        assert_eq!(summary(&conn).unwrap().total_transactions, 1);
    }

    #[test]
    fn test_category_stored_as_null() {
        let (_dir, mut conn) = test_db();
        insert_transactions(&mut conn, &[rec("t1", "2024-01-02", 1.0, None)]).unwrap();
        let is_null: bool = conn
            .query_row("SELECT category IS NULL FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert!(is_null);
    }

    #[test]
    fn test_summary() {
        let (_dir, mut conn) = test_db();
        let records = vec![
            rec("t1", "2024-01-02", 10.5, Some("food")),
            rec("t2", "2024-03-04", 4.5, Some("food")),
            rec("t3", "2023-12-31", 100.0, Some("travel")),
            rec("t4", "2024-06-02", 7.75, None),
            rec("t5", "2024-06-03", 1.0 / 3.0, None),
        ];
        insert_transactions(&mut conn, &records).unwrap();

        let s = summary(&conn).unwrap();
        assert_eq!(s.total_transactions, 5);
        assert_eq!(
            s.per_category,
            vec![
                CategorySummary { category: "travel".into(), count: 1, total: 100.0, average: 100.0 },
                CategorySummary { category: "food".into(), count: 2, total: 15.0, average: 7.5 },
                CategorySummary { category: UNCATEGORIZED.into(), count: 2, total: 8.08, average: 4.04 },
            ]
        );
        assert_eq!(
            s.date_range,
            Some(DateRange { start: "2023-12-31".into(), end: "2024-06-03".into() })
        );
    }

    #[test]
    fn test_summary_empty() {
        let (_dir, conn) = test_db();
        let s = summary(&conn).unwrap();
        assert_eq!(s.total_transactions, 0);
        assert!(s.per_category.is_empty());
        assert_eq!(s.date_range, None);
    }

    #[test]
    fn test_record_and_list_loads() {
        let (_dir, conn) = test_db();
        for name in ["a.csv", "b.csv"] {
            record_load(
                &conn,
                &LoadRecord {
                    filename: name.to_string(),
                    checksum: Some("abc".into()),
                    rows_read: 7,
                    inserted: 2,
                    dropped: 5,
                    ..Default::default()
                },
            )
            .unwrap();
        }
        let loads = list_loads(&conn).unwrap();
        assert_eq!(loads.len(), 2);
        assert_eq!(loads[0].filename, "b.csv");
        assert_eq!(loads[0].dropped, 5);
        assert!(loads[0].loaded_at.is_some());
        assert_eq!(loads[1].date_range_start, None);
    }
}
