//! Plain-text and JSON rendering of an [`AnalysisResult`].

use std::fmt::Write as _;

use energy_core::formatting::{format_currency, format_kwh, format_number, percentage};
use energy_core::models::Record;
use energy_core::settings::Settings;
use energy_core::time_utils::{format_date, format_timestamp};
use energy_data::analysis::{Analysis, AnalysisMetadata, AnalysisResult};
use energy_data::bands::BandClassifier;
use serde::Serialize;

const NO_DATA: &str = "  No data.";

/// Display options taken from the settings.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub currency: String,
    pub preview_rows: usize,
}

impl From<&Settings> for ReportOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            currency: settings.currency.clone(),
            preview_rows: usize::from(settings.preview_rows),
        }
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

pub fn render_text(result: &AnalysisResult, options: &ReportOptions) -> String {
    let mut out = String::new();
    render_overview(&mut out, result, options);
    render_daily(&mut out, &result.analysis);
    render_hourly(&mut out, &result.analysis);
    render_bands(&mut out, &result.analysis);
    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "─".repeat(title.chars().count()));
}

fn render_overview(out: &mut String, result: &AnalysisResult, options: &ReportOptions) {
    let a = &result.analysis;
    heading(out, "Overview");

    let stats = &result.metadata.parse;
    let _ = writeln!(
        out,
        "  Rows read: {}, kept: {}, dropped: {}",
        stats.rows_read,
        stats.rows_kept,
        stats.rows_dropped()
    );

    let preview: Vec<&Record> = result.records.iter().take(options.preview_rows).collect();
    if !preview.is_empty() {
        let _ = writeln!(out, "\n  {:<19}  {:>12}  {:>12}", "timestamp", "kWh", "cost");
        for record in preview {
            let _ = writeln!(
                out,
                "  {:<19}  {:>12}  {:>12}",
                format_timestamp(record.timestamp()),
                format_number(record.consumption_kwh(), 2),
                format_currency(record.total_cost(), &options.currency)
            );
        }
        out.push('\n');
    }

    match &a.range {
        Some(range) => {
            let _ = writeln!(
                out,
                "  Selected period: {} to {}",
                format_date(range.start),
                format_date(range.end)
            );
        }
        None => {
            out.push_str(NO_DATA);
            out.push('\n');
            return;
        }
    }

    if a.summary.is_empty() {
        let _ = writeln!(out, "  No records in the selected period.");
        return;
    }
    let _ = writeln!(
        out,
        "  Total consumption in period: {}",
        format_kwh(a.summary.total_consumption_kwh)
    );
    let _ = writeln!(
        out,
        "  Total cost in period: {}",
        format_currency(a.summary.total_cost, &options.currency)
    );
}

fn render_daily(out: &mut String, a: &Analysis) {
    heading(out, "Total consumption per day");
    if a.daily.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return;
    }
    for day in &a.daily {
        let _ = writeln!(
            out,
            "  {}  {:>14}",
            format_date(day.date),
            format_kwh(day.consumption_kwh)
        );
    }
    if let Some(max) = &a.max_day {
        let _ = writeln!(
            out,
            "\n  Day with highest consumption: {} ({})",
            format_date(max.date),
            format_kwh(max.consumption_kwh)
        );
    }
}

fn render_hourly(out: &mut String, a: &Analysis) {
    heading(out, "Average consumption per hour");
    if a.hourly.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return;
    }
    for hour in &a.hourly {
        let _ = writeln!(
            out,
            "  {:02}h  {:>14}  ({} samples)",
            hour.hour,
            format_kwh(hour.average_kwh),
            hour.samples
        );
    }
}

fn render_bands(out: &mut String, a: &Analysis) {
    heading(out, "Consumption distribution");
    // An empty view still carries three zero bands.
    if a.daily.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return;
    }
    let total = BandClassifier::total(&a.bands);
    for band in &a.bands {
        let _ = writeln!(
            out,
            "  {:<16}  {:>14}  {:>6}%",
            band.band.label(),
            format_kwh(band.consumption_kwh),
            format_number(percentage(band.consumption_kwh, total, 1), 1)
        );
    }
}

// ── JSON ──────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    analysis: &'a Analysis,
    metadata: &'a AnalysisMetadata,
    preview: &'a [Record],
}

pub fn render_json(result: &AnalysisResult, options: &ReportOptions) -> serde_json::Result<String> {
    let preview_len = options.preview_rows.min(result.records.len());
    serde_json::to_string_pretty(&JsonReport {
        analysis: &result.analysis,
        metadata: &result.metadata,
        preview: &result.records[..preview_len],
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
