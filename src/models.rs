use std::collections::HashMap;

pub const TRANSACTION_ID: &str = "transaction_id";
pub const USER_ID: &str = "user_id";
pub const TRANSACTION_DATE: &str = "transaction_date";
pub const AMOUNT: &str = "amount";
pub const CATEGORY: &str = "category";

/// Columns every input file must carry. Extra columns are ignored.
pub const REQUIRED_FIELDS: &[&str] = &[TRANSACTION_ID, USER_ID, TRANSACTION_DATE, AMOUNT, CATEGORY];

/// One input row before validation. A field may be missing entirely
/// (short CSV line) or present but empty.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// Source line number, used in log messages only.
    pub line: u64,
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new<K, V>(line: u64, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// A row that passed every validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub transaction_id: String,
    pub user_id: i64,
    /// Always `YYYY-MM-DD`.
    pub transaction_date: String,
    pub amount: f64,
    pub category: Option<String>,
}
