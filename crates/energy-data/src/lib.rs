//! Aggregation engine for energy-consumption logs.
//!
//! Responsible for reading delimited input, validating rows into records,
//! filtering by date range, computing daily, hourly and band aggregates and
//! running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod bands;
pub mod columns;
pub mod filter;
pub mod parser;
pub mod reader;

pub use energy_core as core;
