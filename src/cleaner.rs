use std::collections::HashSet;
use std::fmt;

use crate::amount::parse_amount;
use crate::dates::{normalize_date, DateError};
use crate::error::{Result, TxnError};
use crate::models::{
    CleanRecord, RawRow, AMOUNT, CATEGORY, REQUIRED_FIELDS, TRANSACTION_DATE, TRANSACTION_ID,
    USER_ID,
};

/// Sink for per-row rejection messages.
pub trait RowLog {
    fn warning(&self, msg: &str);
    fn info(&self, msg: &str);
}

/// Forwards rejections to the global `tracing` subscriber.
pub struct TracingLog;

impl RowLog for TracingLog {
    fn warning(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    MissingId,
    Duplicate(String),
    InvalidDate { raw: Option<String>, reason: DateError },
    InvalidAmount,
    NegativeAmount(f64),
    InvalidUserId(Option<String>),
}

impl Rejection {
    /// Duplicates and negative amounts are business-rule drops, not bad data.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Duplicate(_) | Self::NegativeAmount(_) => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "missing {TRANSACTION_ID}"),
            Self::Duplicate(id) => write!(f, "duplicate {TRANSACTION_ID}={id}"),
            Self::InvalidDate { raw, reason } => {
                write!(f, "invalid date '{}' ({reason})", raw.as_deref().unwrap_or(""))
            }
            Self::InvalidAmount => write!(f, "missing/invalid {AMOUNT}"),
            Self::NegativeAmount(val) => write!(f, "negative {AMOUNT} {val}"),
            Self::InvalidUserId(raw) => {
                write!(f, "invalid {USER_ID} '{}'", raw.as_deref().unwrap_or(""))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// clean_rows
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CleanOutcome {
    pub records: Vec<CleanRecord>,
    pub dropped: usize,
}

/// Fail unless every required column is present. Missing names come back sorted.
pub fn check_columns<S: AsRef<str>>(field_names: &[S]) -> Result<()> {
    let mut missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|req| !field_names.iter().any(|f| f.as_ref() == **req))
        .map(|req| req.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(TxnError::MissingColumns(missing))
}

/// Validate rows in order, keeping the first accepted row per transaction id.
/// Each dropped row produces exactly one log message and one count.
pub fn clean_rows<S, I>(field_names: &[S], rows: I, log: &dyn RowLog) -> Result<CleanOutcome>
where
    S: AsRef<str>,
    I: IntoIterator<Item = Result<RawRow>>,
{
    check_columns(field_names)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut outcome = CleanOutcome::default();

    for row in rows {
        let row = row?;
        match check_row(&row, &seen) {
            Ok(record) => {
                seen.insert(record.transaction_id.clone());
                outcome.records.push(record);
            }
            Err(rejection) => {
                let msg = format!("Row {}: {rejection}; dropped", row.line);
                match rejection.severity() {
                    Severity::Warning => log.warning(&msg),
                    Severity::Info => log.info(&msg),
                }
                outcome.dropped += 1;
            }
        }
    }

    Ok(outcome)
}

/// The rule chain. Order matters: the first failing check decides the reason.
fn check_row(row: &RawRow, seen: &HashSet<String>) -> std::result::Result<CleanRecord, Rejection> {
    let txid = row.get(TRANSACTION_ID).unwrap_or("").trim();
    if txid.is_empty() {
        return Err(Rejection::MissingId);
    }
    if seen.contains(txid) {
        return Err(Rejection::Duplicate(txid.to_string()));
    }

    let date_raw = row.get(TRANSACTION_DATE);
    let transaction_date = normalize_date(date_raw).map_err(|reason| Rejection::InvalidDate {
        raw: date_raw.map(str::to_string),
        reason,
    })?;

    let amount = parse_amount(row.get(AMOUNT)).ok_or(Rejection::InvalidAmount)?;
    if amount < 0.0 {
        return Err(Rejection::NegativeAmount(amount));
    }

    let user_raw = row.get(USER_ID);
    let user_id = user_raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id >= 0)
        .ok_or_else(|| Rejection::InvalidUserId(user_raw.map(str::to_string)))?;

    let category = row
        .get(CATEGORY)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(CleanRecord {
        transaction_id: txid.to_string(),
        user_id,
        transaction_date,
        amount,
        category,
    })
}
