use std::path::Path;

use log::info;
use polars::prelude::*;

use super::{Constructor, Dataset, Driver, LapRecord, Race, ResultRecord};
use crate::PitwallError;

const RACES_FILE: &str = "races.csv";
const LAP_TIMES_FILE: &str = "lap_times.csv";
const DRIVERS_FILE: &str = "drivers.csv";
const CONSTRUCTORS_FILE: &str = "constructors.csv";
const RESULTS_FILE: &str = "results.csv";

/// Token the timing exports use for an absent value.
const NULL_TOKEN: &str = "\\N";

pub(crate) fn load_dataset(dir: &Path) -> Result<Dataset, PitwallError> {
    if !dir.is_dir() {
        return Err(PitwallError::InvalidDataDir {
            path: format!("{:?}", dir),
        });
    }

    let races = load_races(dir)?;
    let laps = load_laps(dir)?;
    let drivers = load_drivers(dir)?;
    let constructors = load_constructors(dir)?;
    let results = load_results(dir)?;

    info!(
        "Loaded {:?}: {} races, {} lap records, {} drivers, {} constructors, {} results",
        dir,
        races.len(),
        laps.len(),
        drivers.len(),
        constructors.len(),
        results.len()
    );

    Ok(Dataset {
        races,
        laps,
        drivers,
        constructors,
        results,
    })
}

fn read_table(dir: &Path, file_name: &str, table: &'static str) -> Result<DataFrame, PitwallError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_null_values(Some(NullValues::AllColumnsSingle(NULL_TOKEN.into()))),
        )
        .try_into_reader_with_file_path(Some(dir.join(file_name)))
        .and_then(|reader| reader.finish())
        .map_err(|e| PitwallError::TableReadError { table, source: e })
}

fn i64_column<'df>(
    df: &'df DataFrame,
    name: &str,
    table: &'static str,
) -> Result<&'df Int64Chunked, PitwallError> {
    df.column(name)
        .and_then(|column| column.i64())
        .map_err(|e| PitwallError::TableReadError { table, source: e })
}

fn str_column<'df>(
    df: &'df DataFrame,
    name: &str,
    table: &'static str,
) -> Result<&'df StringChunked, PitwallError> {
    df.column(name)
        .and_then(|column| column.str())
        .map_err(|e| PitwallError::TableReadError { table, source: e })
}

fn load_races(dir: &Path) -> Result<Vec<Race>, PitwallError> {
    let table = "races";
    let df = read_table(dir, RACES_FILE, table)?;

    let race_id_col = i64_column(&df, "raceId", table)?;
    let year_col = i64_column(&df, "year", table)?;
    let name_col = str_column(&df, "name", table)?;

    let mut races = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(race_id), Some(year), Some(name)) =
            (race_id_col.get(i), year_col.get(i), name_col.get(i))
        {
            races.push(Race {
                race_id: race_id as u32,
                year: year as u16,
                name: name.to_string(),
            });
        }
    }
    Ok(races)
}

fn load_laps(dir: &Path) -> Result<Vec<LapRecord>, PitwallError> {
    let table = "lap times";
    let df = read_table(dir, LAP_TIMES_FILE, table)?;

    let race_id_col = i64_column(&df, "raceId", table)?;
    let driver_id_col = i64_column(&df, "driverId", table)?;
    let lap_col = i64_column(&df, "lap", table)?;
    let position_col = i64_column(&df, "position", table)?;
    let milliseconds_col = i64_column(&df, "milliseconds", table)?;

    let mut laps = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(race_id), Some(driver_id), Some(lap), Some(position), Some(milliseconds)) = (
            race_id_col.get(i),
            driver_id_col.get(i),
            lap_col.get(i),
            position_col.get(i),
            milliseconds_col.get(i),
        ) {
            laps.push(LapRecord {
                race_id: race_id as u32,
                driver_id: driver_id as u32,
                lap: lap as u32,
                position: position as u32,
                milliseconds: milliseconds as u32,
            });
        }
    }
    Ok(laps)
}

fn load_drivers(dir: &Path) -> Result<Vec<Driver>, PitwallError> {
    let table = "drivers";
    let df = read_table(dir, DRIVERS_FILE, table)?;

    let driver_id_col = i64_column(&df, "driverId", table)?;
    let forename_col = str_column(&df, "forename", table)?;
    let surname_col = str_column(&df, "surname", table)?;

    let mut drivers = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(driver_id), Some(forename), Some(surname)) = (
            driver_id_col.get(i),
            forename_col.get(i),
            surname_col.get(i),
        ) {
            drivers.push(Driver {
                driver_id: driver_id as u32,
                forename: forename.to_string(),
                surname: surname.to_string(),
            });
        }
    }
    Ok(drivers)
}

fn load_constructors(dir: &Path) -> Result<Vec<Constructor>, PitwallError> {
    let table = "constructors";
    let df = read_table(dir, CONSTRUCTORS_FILE, table)?;

    let constructor_id_col = i64_column(&df, "constructorId", table)?;
    let name_col = str_column(&df, "name", table)?;

    let mut constructors = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(constructor_id), Some(name)) = (constructor_id_col.get(i), name_col.get(i)) {
            constructors.push(Constructor {
                constructor_id: constructor_id as u32,
                name: name.to_string(),
            });
        }
    }
    Ok(constructors)
}

fn load_results(dir: &Path) -> Result<Vec<ResultRecord>, PitwallError> {
    let table = "results";
    let df = read_table(dir, RESULTS_FILE, table)?;

    let race_id_col = i64_column(&df, "raceId", table)?;
    let driver_id_col = i64_column(&df, "driverId", table)?;
    let constructor_id_col = i64_column(&df, "constructorId", table)?;
    // The position column carries the null token for unclassified drivers,
    // so the reader may infer it as text. Cast instead of failing; values
    // that do not parse become nulls.
    let position_cast = df
        .column("position")
        .and_then(|column| column.cast(&DataType::Int64))
        .map_err(|e| PitwallError::TableReadError { table, source: e })?;
    let position_col = position_cast
        .i64()
        .map_err(|e| PitwallError::TableReadError { table, source: e })?;
    let fastest_lap_col = str_column(&df, "fastestLapTime", table)?;

    let mut results = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(race_id), Some(driver_id), Some(constructor_id)) = (
            race_id_col.get(i),
            driver_id_col.get(i),
            constructor_id_col.get(i),
        ) {
            results.push(ResultRecord {
                race_id: race_id as u32,
                driver_id: driver_id as u32,
                constructor_id: constructor_id as u32,
                position: position_col.get(i).map(|p| p as u32),
                fastest_lap_time: fastest_lap_col.get(i).map(|t| t.to_string()),
            });
        }
    }
    Ok(results)
}
