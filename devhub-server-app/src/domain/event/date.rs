use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::event::ValidationError;

pub const INVALID_DATE_FORMAT: &str = "Invalid date format";

const OFFSET_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// %B also accepts abbreviated month names when parsing.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Normalizes a date-like string to `YYYY-MM-DD`.
///
/// Timestamps carrying an offset are converted to UTC before the date is
/// taken. Inputs without an offset are read as UTC.
pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    parse_date(input.trim())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ValidationError::new("date", INVALID_DATE_FORMAT))
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    OFFSET_DATE_TIME_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(input, f).ok())
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .or_else(|| {
            NAIVE_DATE_TIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(input, f).ok())
        })
        .or_else(|| parse_partial_date(input))
}

/// `YYYY` and `YYYY-MM` mean the first day of that year or month.
fn parse_partial_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    let padded = match bytes.len() {
        4 if bytes.iter().all(u8::is_ascii_digit) => format!("{}-01-01", input),
        7 if bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit) =>
        {
            format!("{}-01", input)
        }
        _ => return None,
    };
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()
}
