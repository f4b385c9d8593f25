use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::models::{Field, FieldError};

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Coerces raw cell values into wall-clock timestamps.
///
/// Offsets present in the source are dropped after parsing: the local
/// wall-clock reading is what the date and hour buckets use.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Naive date-time layouts tried in order after the offset-aware ones.
    const NAIVE_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];

    const OFFSET_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S%z",
    ];

    const DATE_FORMATS: &'static [&'static str] = &["%Y-%m-%d", "%Y/%m/%d"];

    /// Parse a raw cell into a [`NaiveDateTime`].
    ///
    /// * `null` / empty string → [`FieldError::Missing`]
    /// * JSON string → RFC 3339, ISO-like date-times, or a bare date (midnight)
    /// * JSON number → Unix seconds
    pub fn parse(value: &Value) -> Result<NaiveDateTime, FieldError> {
        match value {
            Value::Null => Err(FieldError::Missing(Field::Timestamp)),
            Value::String(s) => Self::parse_str(s),
            Value::Number(n) => {
                let parsed = if let Some(secs) = n.as_i64() {
                    DateTime::from_timestamp(secs, 0)
                } else if let Some(f) = n.as_f64().filter(|f| f.is_finite()) {
                    let secs = f.floor();
                    let nanos = ((f - secs) * 1_000_000_000.0).round() as u32;
                    let secs = secs as i64;
                    DateTime::from_timestamp(secs, nanos.min(999_999_999))
                } else {
                    None
                };
                parsed
                    .map(|dt| dt.naive_utc())
                    .ok_or_else(|| unparseable(Field::Timestamp, value))
            }
            _ => Err(unparseable(Field::Timestamp, value)),
        }
    }

    /// Parse a timestamp string. Day/month-ambiguous layouts are not accepted.
    pub fn parse_str(raw: &str) -> Result<NaiveDateTime, FieldError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(FieldError::Missing(Field::Timestamp));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.naive_local());
        }
        for fmt in Self::OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(dt.naive_local());
            }
        }
        for fmt in Self::NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(naive);
            }
        }
        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                    return Ok(midnight);
                }
            }
        }

        Err(FieldError::Unparseable {
            field: Field::Timestamp,
            raw: s.to_string(),
        })
    }
}

// ── NumberProcessor ───────────────────────────────────────────────────────────

/// Coerces raw cell values into `f64`.
pub struct NumberProcessor;

impl NumberProcessor {
    /// Parse a raw cell as a number for `field`.
    ///
    /// Strings are trimmed before parsing. Range checks (finite, sign) belong
    /// to [`crate::models::Record::new`], not here.
    pub fn parse(value: &Value, field: Field) -> Result<f64, FieldError> {
        match value {
            Value::Null => Err(FieldError::Missing(field)),
            Value::Number(n) => n.as_f64().ok_or_else(|| unparseable(field, value)),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(FieldError::Missing(field));
                }
                trimmed.parse::<f64>().map_err(|_| FieldError::Unparseable {
                    field,
                    raw: trimmed.to_string(),
                })
            }
            _ => Err(unparseable(field, value)),
        }
    }
}

fn unparseable(field: Field, value: &Value) -> FieldError {
    FieldError::Unparseable {
        field,
        raw: value.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
