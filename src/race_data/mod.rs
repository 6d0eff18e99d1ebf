mod loader;

use std::path::Path;

use crate::PitwallError;

/// Season of the race the dashboard is built around.
pub const TARGET_SEASON: u16 = 2018;
/// Name of the race the dashboard is built around, as it appears in the
/// race catalogue.
pub const TARGET_RACE_NAME: &str = "Monaco Grand Prix";

/// One scheduled event in the race catalogue.
#[derive(Clone, Debug, PartialEq)]
pub struct Race {
    pub race_id: u32,
    pub year: u16,
    pub name: String,
}

/// One driver's timing and position snapshot for one lap of one race.
#[derive(Clone, Debug, PartialEq)]
pub struct LapRecord {
    pub race_id: u32,
    pub driver_id: u32,
    pub lap: u32,
    pub position: u32,
    /// Elapsed lap time in milliseconds
    pub milliseconds: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Driver {
    pub driver_id: u32,
    pub forename: String,
    pub surname: String,
}

impl Driver {
    /// Display name used everywhere downstream, forename first.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Constructor {
    pub constructor_id: u32,
    pub name: String,
}

/// One driver's final outcome for one race.
///
/// `position` is absent for drivers that were not classified and
/// `fastest_lap_time` is absent when the export carries no fastest lap;
/// both stay optional all the way into the summary table.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
    pub race_id: u32,
    pub driver_id: u32,
    pub constructor_id: u32,
    pub position: Option<u32>,
    pub fastest_lap_time: Option<String>,
}

/// The five reference tables, loaded once and never mutated afterwards.
/// User interactions only ever filter and join these into new derived
/// tables.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub races: Vec<Race>,
    pub laps: Vec<LapRecord>,
    pub drivers: Vec<Driver>,
    pub constructors: Vec<Constructor>,
    pub results: Vec<ResultRecord>,
}

impl Dataset {
    /// Loads the five CSV exports from `dir`. Expected file names are
    /// `races.csv`, `lap_times.csv`, `drivers.csv`, `constructors.csv`
    /// and `results.csv`.
    pub fn load(dir: &Path) -> Result<Self, PitwallError> {
        loader::load_dataset(dir)
    }
}
