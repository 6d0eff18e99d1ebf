// Library interface for pitwall
// This allows integration tests to access internal modules

pub mod errors;
pub mod prepare;
pub mod race_data;

// Re-export commonly used types
pub use errors::PitwallError;
pub use prepare::{
    DriverNamed, LapRow, ResultRow, filter_by_drivers, laps_at_lap, prepare_laps, prepare_results,
    resolve_race,
};
pub use race_data::{
    Constructor, Dataset, Driver, LapRecord, Race, ResultRecord, TARGET_RACE_NAME, TARGET_SEASON,
};
