use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    Missing,
    Empty,
    Unparsed,
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing date"),
            Self::Empty => f.write_str("empty date"),
            Self::Unparsed => f.write_str("unparsed"),
        }
    }
}

/// `Ok` carries the canonical `YYYY-MM-DD` text.
pub type DateResult = std::result::Result<String, DateError>;

// Tried only when the input starts with a four-digit year.
const YEAR_FIRST: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const COMPACT: &[&str] = &["%Y%m%d"];

// Ambiguous numeric dates read month before day.
const MONTH_FIRST: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

// Full month names need `%B`; `%b` only takes the abbreviation.
const TEXTUAL: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%b. %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%d %b, %Y",
    "%d-%B-%Y",
    "%d-%b-%Y",
];

const TIME_SUFFIXES: &[&str] = &[
    "T%H:%M:%S%.f",
    "T%H:%M",
    " %H:%M:%S%.f",
    " %H:%M",
    " %I:%M %p",
    " %I:%M:%S %p",
];

/// Parse a human-entered date into `YYYY-MM-DD`, dropping any time of day.
pub fn normalize_date(raw: Option<&str>) -> DateResult {
    let raw = raw.ok_or(DateError::Missing)?;
    let s = raw.trim();
    if s.is_empty() {
        return Err(DateError::Empty);
    }
    parse_any(s)
        .filter(|d| (1..=9999).contains(&d.year()))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or(DateError::Unparsed)
}

fn parse_any(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let s = strip_weekday(s);
    let leading_digits = s.chars().take_while(char::is_ascii_digit).count();
    match leading_digits {
        4 => parse_with(s, YEAR_FIRST),
        8 => parse_with(s, COMPACT),
        _ => parse_with(s, MONTH_FIRST)
            .or_else(|| parse_with(s, TEXTUAL))
            .map(widen_short_year),
    }
}

/// Drop a leading day name ("Tue, ", "Monday "). It is not checked against the date.
fn strip_weekday(s: &str) -> &str {
    let end = s
        .find(|c: char| c == ',' || c.is_whitespace())
        .unwrap_or(s.len());
    if end < s.len() && s[..end].parse::<Weekday>().is_ok() {
        s[end..].trim_start_matches(|c: char| c == ',' || c.is_whitespace())
    } else {
        s
    }
}

fn parse_with(s: &str, formats: &[&str]) -> Option<NaiveDate> {
    for fmt in formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in formats {
        for suffix in TIME_SUFFIXES {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, &format!("{fmt}{suffix}")) {
                return Some(dt.date());
            }
        }
    }
    None
}

/// `01/02/24` parses as year 24; pivot two-digit years the way `%y` does.
fn widen_short_year(d: NaiveDate) -> NaiveDate {
    let y = d.year();
    if !(0..100).contains(&y) {
        return d;
    }
    let full = if y < 70 { 2000 + y } else { 1900 + y };
    d.with_year(full).unwrap_or(d)
}
