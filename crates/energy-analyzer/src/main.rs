mod bootstrap;
mod report;

use std::process::ExitCode;

use anyhow::{Context, Result};
use energy_core::settings::{LastUsedParams, Settings};
use energy_data::analysis::analyze_file;
use energy_data::filter::DateRange;

use crate::report::ReportOptions;

fn main() -> Result<ExitCode> {
    let settings = Settings::load_with_last_used().unwrap_or_else(|e| e.exit());

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Energy Analyzer v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.clear {
        let path = LastUsedParams::config_path();
        match LastUsedParams::clear_at(&path) {
            Ok(()) => tracing::info!("Cleared saved preferences at {}", path.display()),
            Err(e) => tracing::warn!("Could not clear {}: {}", path.display(), e),
        }
    }

    tracing::info!(
        "Input: {}, scope: {}, format: {}",
        settings.csv_path.display(),
        settings.view_scope,
        settings.format
    );

    let analysis = DateRange::parse(settings.start_date.as_deref(), settings.end_date.as_deref())
        .and_then(|range| analyze_file(&settings.csv_path, &range, settings.scope()));
    let result = match analysis {
        Ok(result) => result,
        // Bad columns or dates are the user's to fix: say so plainly.
        Err(e) if e.is_input_error() => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Could not analyze {}", settings.csv_path.display()));
        }
    };

    let dropped = result.metadata.parse.rows_dropped();
    if dropped > 0 {
        tracing::warn!(
            "{} of {} rows were dropped for unparseable values",
            dropped,
            result.metadata.parse.rows_read
        );
    }

    let options = ReportOptions::from(&settings);
    let output = if settings.wants_json() {
        report::render_json(&result, &options)?
    } else {
        report::render_text(&result, &options)
    };
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}
