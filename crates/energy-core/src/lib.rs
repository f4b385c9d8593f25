//! Shared building blocks for the energy analyzer.
//!
//! Domain types, the error taxonomy, raw-value coercion, command-line
//! settings and display formatting.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{EnergyError, Result};
