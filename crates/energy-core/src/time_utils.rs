use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

/// Calendar-date layouts accepted for range bounds.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a calendar date such as `"2024-01-31"`.
///
/// A full timestamp is accepted too and truncated to its date, since date
/// pickers in front ends often hand over midnight date-times.
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(ts) = crate::data_processors::TimestampProcessor::parse_str(s) {
        return Some(ts.date());
    }

    warn!("parse_date: could not parse date \"{}\"", s);
    None
}

/// Format a timestamp the way reports show it: `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
