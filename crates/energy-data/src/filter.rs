//! Inclusive calendar-date range selection.

use chrono::NaiveDate;
use energy_core::models::Record;
use energy_core::time_utils::parse_date;
use energy_core::{EnergyError, Result};
use serde::Serialize;

/// Requested date bounds; an omitted bound defaults to the data's extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Build a range from user-supplied strings.
    ///
    /// Blank strings count as omitted. Anything else that is not a calendar
    /// date fails with [`EnergyError::InvalidRange`]. A reversed range is
    /// accepted here and simply selects nothing.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: parse_bound("start", start)?,
            end: parse_bound("end", end)?,
        })
    }

    /// Fill omitted bounds from the earliest/latest record.
    ///
    /// `None` when a bound is omitted and there are no records to take it from.
    pub fn resolve(&self, records: &[Record]) -> Option<ResolvedRange> {
        let start = match self.start {
            Some(d) => d,
            None => records.iter().map(Record::date).min()?,
        };
        let end = match self.end {
            Some(d) => d,
            None => records.iter().map(Record::date).max()?,
        };
        Some(ResolvedRange { start, end })
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| EnergyError::InvalidRange(format!("{name} date \"{s}\" is not a date"))),
    }
}

/// Concrete inclusive bounds after defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ResolvedRange {
    /// `true` when `date` lies in `[start, end]`; always `false` if reversed.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }
}

/// Stateless date-range filter.
pub struct DateRangeFilter;

impl DateRangeFilter {
    /// Records whose date falls in the inclusive range, in input order.
    ///
    /// Comparing on the date component makes the end bound cover every time
    /// on `end`, through 23:59:59.999….
    pub fn filter(records: &[Record], range: &DateRange) -> Vec<Record> {
        match range.resolve(records) {
            Some(resolved) => Self::filter_resolved(records, &resolved),
            None => Vec::new(),
        }
    }

    pub fn filter_resolved(records: &[Record], range: &ResolvedRange) -> Vec<Record> {
        if range.is_reversed() {
            return Vec::new();
        }
        records
            .iter()
            .filter(|r| range.contains(r.date()))
            .copied()
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
