use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the energy analyzer.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// One or more required logical columns are absent after header
    /// normalization. Aborts the whole load.
    #[error("Missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A date-range bound could not be resolved to a calendar date.
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited input could not be decoded.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl EnergyError {
    /// `true` for the failures a caller should surface as a user-facing
    /// message rather than an internal fault.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::InvalidRange(_))
    }
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, EnergyError>;
