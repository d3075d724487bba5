use std::fs::File;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::cleaner::{clean_rows, CleanOutcome, RowLog};
use crate::error::Result;
use crate::models::RawRow;

/// Rows of a headed CSV file, each keyed by column name.
pub struct CsvRows {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<File>,
}

impl CsvRows {
    pub fn open(path: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let headers = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        Ok(Self {
            headers,
            records: rdr.into_records(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for CsvRows {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        let line = record.position().map_or(0, |p| p.line());
        // Short lines leave trailing columns absent rather than empty.
        let fields = self.headers.iter().cloned().zip(record.iter().map(str::to_string));
        Some(Ok(RawRow::new(line, fields)))
    }
}

/// Read `path` and run every row through the cleaner.
pub fn read_and_clean_csv(path: &Path, log: &dyn RowLog) -> Result<(CleanOutcome, usize)> {
    let rows = CsvRows::open(path)?;
    let headers = rows.headers().to_vec();
    let mut total = 0usize;
    let counted = rows.inspect(|_| total += 1);
    let outcome = clean_rows(&headers, counted, log)?;
    Ok((outcome, total))
}

pub fn file_checksum(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
