// Error types for pitwall

use polars::error::PolarsError;
use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PitwallError {
    // Errors while resolving the target race
    #[snafu(display("No race found for season {year} named \"{name}\""))]
    RaceNotFound { year: u16, name: String },
    #[snafu(display(
        "{matches} races found for season {year} named \"{name}\", expected exactly one"
    ))]
    AmbiguousRace {
        year: u16,
        name: String,
        matches: usize,
    },

    // Errors while loading the reference tables
    #[snafu(display("Invalid data directory: {path}"))]
    InvalidDataDir { path: String },
    #[snafu(display("Error reading the {table} table"))]
    TableReadError {
        table: &'static str,
        source: PolarsError,
    },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}
