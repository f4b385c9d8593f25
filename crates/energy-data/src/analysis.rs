//! Full analysis pipeline.
//!
//! Parses a table, applies the date range, and computes the summary and the
//! three views, returning an [`AnalysisResult`] ready for rendering.

use std::path::Path;

use chrono::Utc;
use energy_core::models::{BandTotal, DailyTotal, HourlyAverage, Record, Summary, ViewScope};
use energy_core::Result;
use serde::Serialize;
use tracing::info;

use crate::aggregator::{DailyAggregator, HourlyAggregator};
use crate::bands::BandClassifier;
use crate::filter::{DateRange, DateRangeFilter, ResolvedRange};
use crate::parser::{ParseStats, RawTable, RecordParser};
use crate::reader::read_csv_file;

// ── Public types ──────────────────────────────────────────────────────────────

/// Aggregates derived from one record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Effective bounds after defaulting; `None` when there was nothing to
    /// default from.
    pub range: Option<ResolvedRange>,
    /// Totals over the records inside `range`.
    pub summary: Summary,
    pub scope: ViewScope,
    pub daily: Vec<DailyTotal>,
    pub max_day: Option<DailyTotal>,
    pub hourly: Vec<HourlyAverage>,
    pub bands: [BandTotal; 3],
}

/// Metadata produced alongside the analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub parse: ParseStats,
    pub records_in_range: usize,
    pub parse_time_seconds: f64,
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`run_analysis`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub analysis: Analysis,
    pub metadata: AnalysisMetadata,
    /// Every parsed record, in source order.
    #[serde(skip)]
    pub records: Vec<Record>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Compute the summary and views for already-parsed records.
///
/// The summary always covers the date range. The daily, hourly and band views
/// cover every record under [`ViewScope::All`] and only the range under
/// [`ViewScope::Range`]. Empty input gives empty views and no maximum day.
pub fn analyze(records: &[Record], range: &DateRange, scope: ViewScope) -> Analysis {
    let resolved = range.resolve(records);
    let in_range = match &resolved {
        Some(r) => DateRangeFilter::filter_resolved(records, r),
        None => Vec::new(),
    };

    let view_records: &[Record] = match scope {
        ViewScope::All => records,
        ViewScope::Range => &in_range,
    };

    let daily = DailyAggregator::aggregate(view_records);
    let max_day = DailyAggregator::max_day(&daily).cloned();

    Analysis {
        range: resolved,
        summary: Summary::from_records(&in_range),
        scope,
        hourly: HourlyAggregator::aggregate(view_records),
        bands: BandClassifier::classify(view_records),
        daily,
        max_day,
    }
}

/// Parse `table` and analyze it.
///
/// Fails with a schema error before any aggregation when a required column
/// is missing.
pub fn run_analysis(table: &RawTable, range: &DateRange, scope: ViewScope) -> Result<AnalysisResult> {
    let parse_start = std::time::Instant::now();
    let parsed = RecordParser::parse(table)?;
    let parse_time = parse_start.elapsed().as_secs_f64();

    let aggregate_start = std::time::Instant::now();
    let analysis = analyze(&parsed.records, range, scope);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    info!(
        "Analyzed {} records ({} in range, {} days)",
        parsed.records.len(),
        analysis.summary.records,
        analysis.daily.len()
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        parse: parsed.stats,
        records_in_range: analysis.summary.records,
        parse_time_seconds: parse_time,
        aggregate_time_seconds: aggregate_time,
    };

    Ok(AnalysisResult {
        analysis,
        metadata,
        records: parsed.records,
    })
}

/// Read a CSV file and run the full pipeline on it.
pub fn analyze_file(path: &Path, range: &DateRange, scope: ViewScope) -> Result<AnalysisResult> {
    let table = read_csv_file(path)?;
    run_analysis(&table, range, scope)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
