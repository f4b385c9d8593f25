use clap::{CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::ViewScope;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarise a residential energy-consumption log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "energy-analyzer",
    about = "Summarise a residential energy-consumption log",
    version
)]
pub struct Settings {
    /// CSV file with timestamp, consumption_kwh and total_cost columns
    pub csv_path: PathBuf,

    /// First day of the summary range (YYYY-MM-DD, defaults to the first day in the data)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day of the summary range, inclusive (defaults to the last day in the data)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Record set the daily, hourly and band views use
    #[arg(long, default_value = "all", value_parser = ["all", "range"])]
    pub view_scope: String,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Currency symbol shown in front of costs (display only)
    #[arg(long, default_value = "R$")]
    pub currency: String,

    /// Number of parsed records shown in the overview (0-100)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(0..=100))]
    pub preview_rows: u16,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved display preferences
    #[arg(long)]
    pub clear: bool,
}

impl Settings {
    /// Parsed `--view-scope`; the value parser only admits known scopes.
    pub fn scope(&self) -> ViewScope {
        self.view_scope.parse().unwrap_or_default()
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Display preferences persisted to `~/.energy-analyzer/last_used.json`.
///
/// Dates and file paths are never persisted: they describe one run, not a
/// preference.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_rows: Option<u16>,
}

impl LastUsedParams {
    /// Default location of the persisted preferences.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".energy-analyzer").join("last_used.json")
    }

    /// Load persisted params; `Default` when the file is absent or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable preferences at {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Write params to `path` through a temp file and rename.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            format: Some(s.format.clone()),
            currency: Some(s.currency.clone()),
            view_scope: Some(s.view_scope.clone()),
            preview_rows: Some(s.preview_rows),
        }
    }
}

// ── Loading ────────────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments, merge saved preferences and persist the
    /// result for the next run.
    pub fn load_with_last_used() -> Result<Self, clap::Error> {
        Self::load_with_last_used_impl(std::env::args_os().collect(), &LastUsedParams::config_path())
    }

    /// Same as [`Settings::load_with_last_used`] with explicit arguments and
    /// config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Result<Self, clap::Error> {
        let matches = Settings::command().try_get_matches_from(args)?;
        let mut settings = Settings::from_arg_matches(&matches)?;

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        // Clearing itself is left to the caller, once logging is up.
        if settings.clear {
            return Ok(settings);
        }

        // CLI values always win over persisted ones.
        let last = LastUsedParams::load_from(config_path);
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format.filter(|v| v == "text" || v == "json") {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "currency") {
            if let Some(v) = last.currency {
                settings.currency = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view_scope") {
            if let Some(v) = last.view_scope.filter(|v| v.parse::<ViewScope>().is_ok()) {
                settings.view_scope = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "preview_rows") {
            if let Some(v) = last.preview_rows.filter(|v| *v <= 100) {
                settings.preview_rows = v;
            }
        }

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!("Could not save preferences to {}: {}", config_path.display(), e);
        }

        Ok(settings)
    }
}

/// `true` when `name` was supplied on the command line rather than by default.
///
/// clap stores the arg id under the field name (underscores), not the flag.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
