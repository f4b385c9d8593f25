use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ── Field ─────────────────────────────────────────────────────────────────────

/// The three logical columns every input table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Timestamp,
    Consumption,
    Cost,
}

impl Field {
    /// All required fields, in canonical column order.
    pub const ALL: [Field; 3] = [Field::Timestamp, Field::Consumption, Field::Cost];

    /// Canonical (normalized) column name.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Consumption => "consumption_kwh",
            Field::Cost => "total_cost",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Why a single field of a row failed validation.
///
/// Row-level failures never propagate past the parser: the row is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("{0} is missing or empty")]
    Missing(Field),
    #[error("{field} value {raw:?} could not be parsed")]
    Unparseable { field: Field, raw: String },
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: Field, value: f64 },
}

impl FieldError {
    /// The field that failed.
    pub fn field(&self) -> Field {
        match self {
            FieldError::Missing(field) => *field,
            FieldError::Unparseable { field, .. } | FieldError::OutOfRange { field, .. } => *field,
        }
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One validated observation from the consumption log.
///
/// Only constructible through [`Record::new`], so every instance holds a
/// wall-clock timestamp, a finite non-negative consumption and a finite cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Record {
    timestamp: NaiveDateTime,
    consumption_kwh: f64,
    total_cost: f64,
}

impl Record {
    pub fn new(
        timestamp: NaiveDateTime,
        consumption_kwh: f64,
        total_cost: f64,
    ) -> Result<Self, FieldError> {
        if !consumption_kwh.is_finite() || consumption_kwh < 0.0 {
            return Err(FieldError::OutOfRange {
                field: Field::Consumption,
                value: consumption_kwh,
            });
        }
        if !total_cost.is_finite() {
            return Err(FieldError::OutOfRange {
                field: Field::Cost,
                value: total_cost,
            });
        }
        Ok(Self {
            timestamp,
            consumption_kwh,
            total_cost,
        })
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn consumption_kwh(&self) -> f64 {
        self.consumption_kwh
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Calendar date of the observation.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour-of-day, `0..=23`.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Consumption summed over one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub consumption_kwh: f64,
    pub total_cost: f64,
    pub records: usize,
}

/// Mean consumption for one hour-of-day across every date in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyAverage {
    pub hour: u32,
    pub average_kwh: f64,
    pub samples: usize,
}

/// Fixed hour-of-day band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Peak,
    Night,
    Other,
}

impl Band {
    /// Display order.
    pub const ALL: [Band; 3] = [Band::Peak, Band::Night, Band::Other];

    /// Assign an hour-of-day to its band.
    ///
    /// The arms partition `0..=23`: every hour lands in exactly one band.
    /// Hours past 23 cannot come out of a timestamp and fold into `Other`.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            18..=23 => Band::Peak,
            0..=5 => Band::Night,
            _ => Band::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Peak => "Peak (18h-23h)",
            Band::Night => "Night (0h-5h)",
            Band::Other => "Other",
        }
    }

    /// Position of the band in [`Band::ALL`].
    pub fn index(self) -> usize {
        match self {
            Band::Peak => 0,
            Band::Night => 1,
            Band::Other => 2,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Consumption accumulated into one [`Band`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTotal {
    pub band: Band,
    pub consumption_kwh: f64,
}

// ── ViewScope ─────────────────────────────────────────────────────────────────

/// Which record set the daily, hourly and band views are computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewScope {
    /// Every parsed record, regardless of the selected date range.
    #[default]
    All,
    /// Only the records inside the selected date range.
    Range,
}

impl ViewScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewScope::All => "all",
            ViewScope::Range => "range",
        }
    }
}

impl std::str::FromStr for ViewScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ViewScope::All),
            "range" => Ok(ViewScope::Range),
            other => Err(format!("unknown view scope: {other}")),
        }
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Scalar totals over a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub total_consumption_kwh: f64,
    pub total_cost: f64,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
}

impl Summary {
    pub fn from_records(records: &[Record]) -> Self {
        let mut summary = Summary::default();
        for record in records {
            summary.records += 1;
            summary.total_consumption_kwh += record.consumption_kwh;
            summary.total_cost += record.total_cost;

            let ts = record.timestamp;
            if summary.first_timestamp.map_or(true, |first| ts < first) {
                summary.first_timestamp = Some(ts);
            }
            if summary.last_timestamp.map_or(true, |last| ts > last) {
                summary.last_timestamp = Some(ts);
            }
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
