//! Consumption aggregation by calendar day and by hour-of-day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use energy_core::models::{DailyTotal, HourlyAverage, Record};

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups records by calendar date.
pub struct DailyAggregator;

impl DailyAggregator {
    /// One [`DailyTotal`] per distinct date, sorted ascending.
    pub fn aggregate(records: &[Record]) -> Vec<DailyTotal> {
        // BTreeMap keeps dates sorted.
        let mut map: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();

        for record in records {
            let date = record.date();
            let day = map.entry(date).or_insert_with(|| DailyTotal {
                date,
                consumption_kwh: 0.0,
                total_cost: 0.0,
                records: 0,
            });
            day.consumption_kwh += record.consumption_kwh();
            day.total_cost += record.total_cost();
            day.records += 1;
        }

        map.into_values().collect()
    }

    /// Day with the highest consumption; the earliest wins a tie.
    ///
    /// `None` for an empty slice. Expects `totals` in ascending date order, as
    /// returned by [`DailyAggregator::aggregate`].
    pub fn max_day(totals: &[DailyTotal]) -> Option<&DailyTotal> {
        let mut best: Option<&DailyTotal> = None;
        for day in totals {
            if best.map_or(true, |b| day.consumption_kwh > b.consumption_kwh) {
                best = Some(day);
            }
        }
        best
    }
}

// ── HourlyAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that averages consumption per hour-of-day.
pub struct HourlyAggregator;

impl HourlyAggregator {
    /// Mean consumption for each hour that has at least one record.
    ///
    /// Dates are ignored, so 19:00 on every day shares one bucket. Hours with
    /// no observations are left out rather than reported as zero.
    pub fn aggregate(records: &[Record]) -> Vec<HourlyAverage> {
        let mut sums = [0.0_f64; 24];
        let mut counts = [0usize; 24];

        for record in records {
            // Timelike::hour is always below 24.
            let hour = record.hour() as usize;
            sums[hour] += record.consumption_kwh();
            counts[hour] += 1;
        }

        (0..24)
            .filter(|&h| counts[h] > 0)
            .map(|h| HourlyAverage {
                hour: h as u32,
                average_kwh: sums[h] / counts[h] as f64,
                samples: counts[h],
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
