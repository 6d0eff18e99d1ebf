//! Turns the raw reference tables into the derived, chart-ready tables the
//! dashboard consumes.
//!
//! Everything here is a pure function over the in-memory tables: the same
//! inputs always produce the same outputs. The only failure conditions are
//! the two race-resolution errors; every other anomaly degrades to a
//! sentinel value (gray color, absent best lap) or to the row being
//! dropped under inner-join semantics.

pub mod lap_time;
pub mod team_colors;

use std::collections::{HashMap, HashSet};

use crate::PitwallError;
use crate::race_data::{Constructor, Driver, LapRecord, Race, ResultRecord};

pub use lap_time::parse_lap_time;
pub use team_colors::{FALLBACK_TEAM_COLOR, team_color};

/// One (driver, lap) row of the prepared lap table.
#[derive(Clone, Debug, PartialEq)]
pub struct LapRow {
    pub driver_name: String,
    pub lap: u32,
    pub position: u32,
    pub lap_time_seconds: f64,
    pub team_name: String,
    pub team_color: &'static str,
}

/// One driver's row of the prepared race summary table.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub driver_name: String,
    pub team_name: String,
    pub final_position: Option<u32>,
    pub best_lap_seconds: Option<f64>,
    pub team_color: &'static str,
}

/// Row types that carry a driver display name, so selection filtering
/// works over both derived tables.
pub trait DriverNamed {
    fn driver_name(&self) -> &str;
}

impl DriverNamed for LapRow {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }
}

impl DriverNamed for ResultRow {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }
}

/// Resolves the unique id of the race matching `year` and `name`.
///
/// The caller contract is exactly-one match in well-formed data; zero or
/// multiple matches abort the preparation with a named error carrying the
/// offending filter values.
pub fn resolve_race(races: &[Race], year: u16, name: &str) -> Result<u32, PitwallError> {
    let mut matches = races.iter().filter(|r| r.year == year && r.name == name);

    let first = matches.next().ok_or_else(|| PitwallError::RaceNotFound {
        year,
        name: name.to_string(),
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(PitwallError::AmbiguousRace {
            year,
            name: name.to_string(),
            matches: extra + 1,
        });
    }
    Ok(first.race_id)
}

/// Builds the lap table for one race: lap rows joined with driver names
/// and team names, times converted to fractional seconds, colors attached.
///
/// Lap rows whose driver is missing from the driver catalogue, or whose
/// driver has no resolvable team in this race's results, are dropped. The
/// output is sorted by (driver name, lap) so a line-chart consumer can
/// draw continuous per-driver traces without re-sorting.
pub fn prepare_laps(
    laps: &[LapRecord],
    drivers: &[Driver],
    constructors: &[Constructor],
    results: &[ResultRecord],
    race_id: u32,
) -> Vec<LapRow> {
    let driver_names: HashMap<u32, String> = drivers
        .iter()
        .map(|d| (d.driver_id, d.full_name()))
        .collect();
    let team_by_driver = team_names_by_driver(results, constructors, race_id);

    let mut rows: Vec<LapRow> = laps
        .iter()
        .filter(|lap| lap.race_id == race_id)
        .filter_map(|lap| {
            let driver_name = driver_names.get(&lap.driver_id)?;
            let team_name = team_by_driver.get(&lap.driver_id)?;
            Some(LapRow {
                driver_name: driver_name.clone(),
                lap: lap.lap,
                position: lap.position,
                lap_time_seconds: lap.milliseconds as f64 / 1000.0,
                team_name: team_name.clone(),
                team_color: team_color(team_name),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.driver_name.as_str(), a.lap).cmp(&(b.driver_name.as_str(), b.lap))
    });
    rows
}

/// Builds the race summary table: one row per driver with final position
/// and parsed best lap, sorted by final position with unclassified
/// drivers last.
pub fn prepare_results(
    results: &[ResultRecord],
    drivers: &[Driver],
    constructors: &[Constructor],
    race_id: u32,
) -> Vec<ResultRow> {
    let driver_names: HashMap<u32, String> = drivers
        .iter()
        .map(|d| (d.driver_id, d.full_name()))
        .collect();
    let constructor_names: HashMap<u32, &str> = constructors
        .iter()
        .map(|c| (c.constructor_id, c.name.as_str()))
        .collect();

    let mut rows: Vec<ResultRow> = results
        .iter()
        .filter(|result| result.race_id == race_id)
        .filter_map(|result| {
            let driver_name = driver_names.get(&result.driver_id)?;
            let team_name = constructor_names.get(&result.constructor_id)?;
            Some(ResultRow {
                driver_name: driver_name.clone(),
                team_name: team_name.to_string(),
                final_position: result.position,
                best_lap_seconds: result
                    .fastest_lap_time
                    .as_deref()
                    .and_then(parse_lap_time),
                team_color: team_color(team_name),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        let a_key = (a.final_position.is_none(), a.final_position, &a.driver_name);
        let b_key = (b.final_position.is_none(), b.final_position, &b.driver_name);
        a_key.cmp(&b_key)
    });
    rows
}

/// Keeps only rows whose driver is in `selected`, preserving the existing
/// order. An empty selection yields an empty table; signalling that to the
/// user is the presentation layer's job.
pub fn filter_by_drivers<R: DriverNamed + Clone>(
    rows: &[R],
    selected: &HashSet<String>,
) -> Vec<R> {
    rows.iter()
        .filter(|row| selected.contains(row.driver_name()))
        .cloned()
        .collect()
}

/// Snapshot of all drivers at a single lap, sorted by position ascending.
/// A lap number beyond anything present yields an empty result.
pub fn laps_at_lap(rows: &[LapRow], lap: u32) -> Vec<LapRow> {
    let mut snapshot: Vec<LapRow> = rows.iter().filter(|row| row.lap == lap).cloned().collect();
    snapshot.sort_by(|a, b| {
        (a.position, a.driver_name.as_str()).cmp(&(b.position, b.driver_name.as_str()))
    });
    snapshot
}

/// Derives the driver -> team name mapping for one race from the results
/// table joined to the constructor catalogue. Drivers whose constructor is
/// missing from the catalogue get no entry and their laps are dropped by
/// the caller.
fn team_names_by_driver(
    results: &[ResultRecord],
    constructors: &[Constructor],
    race_id: u32,
) -> HashMap<u32, String> {
    let constructor_names: HashMap<u32, &str> = constructors
        .iter()
        .map(|c| (c.constructor_id, c.name.as_str()))
        .collect();

    let mut team_by_driver = HashMap::new();
    for result in results.iter().filter(|r| r.race_id == race_id) {
        if let Some(name) = constructor_names.get(&result.constructor_id) {
            team_by_driver
                .entry(result.driver_id)
                .or_insert_with(|| name.to_string());
        }
    }
    team_by_driver
}

#[cfg(test)]
mod tests {
    use super::*;

    const RACE_ID: u32 = 989;

    fn sample_races() -> Vec<Race> {
        vec![
            Race {
                race_id: RACE_ID,
                year: 2018,
                name: "Monaco Grand Prix".to_string(),
            },
            Race {
                race_id: 990,
                year: 2018,
                name: "Canadian Grand Prix".to_string(),
            },
            Race {
                race_id: 1001,
                year: 2019,
                name: "Monaco Grand Prix".to_string(),
            },
        ]
    }

    fn sample_drivers() -> Vec<Driver> {
        vec![
            Driver {
                driver_id: 1,
                forename: "Lewis".to_string(),
                surname: "Hamilton".to_string(),
            },
            Driver {
                driver_id: 20,
                forename: "Sebastian".to_string(),
                surname: "Vettel".to_string(),
            },
            Driver {
                driver_id: 154,
                forename: "Romain".to_string(),
                surname: "Grosjean".to_string(),
            },
        ]
    }

    fn sample_constructors() -> Vec<Constructor> {
        vec![
            Constructor {
                constructor_id: 131,
                name: "Mercedes".to_string(),
            },
            Constructor {
                constructor_id: 6,
                name: "Ferrari".to_string(),
            },
            Constructor {
                constructor_id: 210,
                name: "Haas F1 Team".to_string(),
            },
        ]
    }

    fn sample_results() -> Vec<ResultRecord> {
        vec![
            ResultRecord {
                race_id: RACE_ID,
                driver_id: 1,
                constructor_id: 131,
                position: Some(3),
                fastest_lap_time: Some("1:14.345".to_string()),
            },
            ResultRecord {
                race_id: RACE_ID,
                driver_id: 20,
                constructor_id: 6,
                position: Some(1),
                fastest_lap_time: Some("87.123".to_string()),
            },
            ResultRecord {
                race_id: RACE_ID,
                driver_id: 154,
                constructor_id: 210,
                position: None,
                fastest_lap_time: None,
            },
        ]
    }

    fn sample_laps() -> Vec<LapRecord> {
        vec![
            // Out of order on purpose: preparation must sort.
            LapRecord {
                race_id: RACE_ID,
                driver_id: 20,
                lap: 2,
                position: 1,
                milliseconds: 73500,
            },
            LapRecord {
                race_id: RACE_ID,
                driver_id: 1,
                lap: 2,
                position: 2,
                milliseconds: 74001,
            },
            LapRecord {
                race_id: RACE_ID,
                driver_id: 1,
                lap: 1,
                position: 2,
                milliseconds: 74345,
            },
            LapRecord {
                race_id: RACE_ID,
                driver_id: 20,
                lap: 1,
                position: 1,
                milliseconds: 73900,
            },
            // Different race, must be filtered out.
            LapRecord {
                race_id: 990,
                driver_id: 1,
                lap: 1,
                position: 1,
                milliseconds: 71000,
            },
        ]
    }

    #[test]
    fn test_resolve_race_unique_match() {
        let race_id = resolve_race(&sample_races(), 2018, "Monaco Grand Prix").unwrap();
        assert_eq!(race_id, RACE_ID);
    }

    #[test]
    fn test_resolve_race_no_match() {
        let result = resolve_race(&sample_races(), 2018, "Belgian Grand Prix");
        match result {
            Err(PitwallError::RaceNotFound { year, name }) => {
                assert_eq!(year, 2018);
                assert_eq!(name, "Belgian Grand Prix");
            }
            other => panic!("Expected RaceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_race_ambiguous_match() {
        let mut races = sample_races();
        races.push(Race {
            race_id: 2000,
            year: 2018,
            name: "Monaco Grand Prix".to_string(),
        });

        let result = resolve_race(&races, 2018, "Monaco Grand Prix");
        match result {
            Err(PitwallError::AmbiguousRace {
                year,
                name,
                matches,
            }) => {
                assert_eq!(year, 2018);
                assert_eq!(name, "Monaco Grand Prix");
                assert_eq!(matches, 2);
            }
            other => panic!("Expected AmbiguousRace, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_laps_sorted_by_driver_then_lap() {
        let rows = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );

        assert_eq!(rows.len(), 4);
        for pair in rows.windows(2) {
            assert!(pair[0].driver_name <= pair[1].driver_name);
            if pair[0].driver_name == pair[1].driver_name {
                assert!(pair[0].lap < pair[1].lap);
            }
        }
        assert_eq!(rows[0].driver_name, "Lewis Hamilton");
        assert_eq!(rows[0].lap, 1);
    }

    #[test]
    fn test_prepare_laps_preserves_fractional_seconds() {
        let rows = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );

        let first = rows
            .iter()
            .find(|r| r.driver_name == "Lewis Hamilton" && r.lap == 1)
            .unwrap();
        assert_eq!(first.lap_time_seconds, 74.345);
    }

    #[test]
    fn test_prepare_laps_attaches_team_and_color() {
        let rows = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );

        let hamilton = rows.iter().find(|r| r.driver_name == "Lewis Hamilton").unwrap();
        assert_eq!(hamilton.team_name, "Mercedes");
        assert_eq!(hamilton.team_color, "#00D2BE");
    }

    #[test]
    fn test_prepare_laps_drops_rows_that_fail_to_join() {
        let mut laps = sample_laps();
        // Driver missing from the driver catalogue.
        laps.push(LapRecord {
            race_id: RACE_ID,
            driver_id: 999,
            lap: 1,
            position: 10,
            milliseconds: 80000,
        });
        // Driver with no result row in this race, so no resolvable team.
        let mut drivers = sample_drivers();
        drivers.push(Driver {
            driver_id: 30,
            forename: "Fernando".to_string(),
            surname: "Alonso".to_string(),
        });
        laps.push(LapRecord {
            race_id: RACE_ID,
            driver_id: 30,
            lap: 1,
            position: 7,
            milliseconds: 76000,
        });

        let rows = prepare_laps(
            &laps,
            &drivers,
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.driver_name != "Fernando Alonso"));
    }

    #[test]
    fn test_prepare_laps_unknown_team_gets_fallback_color() {
        let constructors = vec![Constructor {
            constructor_id: 131,
            name: "Unknown Racing".to_string(),
        }];
        let results = vec![ResultRecord {
            race_id: RACE_ID,
            driver_id: 1,
            constructor_id: 131,
            position: Some(1),
            fastest_lap_time: None,
        }];
        let laps = vec![LapRecord {
            race_id: RACE_ID,
            driver_id: 1,
            lap: 1,
            position: 1,
            milliseconds: 74000,
        }];

        let rows = prepare_laps(&laps, &sample_drivers(), &constructors, &results, RACE_ID);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_color, FALLBACK_TEAM_COLOR);
    }

    #[test]
    fn test_prepare_laps_is_idempotent() {
        let first = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );
        let second = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_prepare_results_sorted_with_unclassified_last() {
        let rows = prepare_results(
            &sample_results(),
            &sample_drivers(),
            &sample_constructors(),
            RACE_ID,
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].driver_name, "Sebastian Vettel");
        assert_eq!(rows[0].final_position, Some(1));
        assert_eq!(rows[1].driver_name, "Lewis Hamilton");
        assert_eq!(rows[2].driver_name, "Romain Grosjean");
        assert_eq!(rows[2].final_position, None);
    }

    #[test]
    fn test_prepare_results_parses_best_lap_with_absent_sentinel() {
        let rows = prepare_results(
            &sample_results(),
            &sample_drivers(),
            &sample_constructors(),
            RACE_ID,
        );

        let vettel = rows.iter().find(|r| r.driver_name == "Sebastian Vettel").unwrap();
        assert_eq!(vettel.best_lap_seconds, Some(87.123));
        let hamilton = rows.iter().find(|r| r.driver_name == "Lewis Hamilton").unwrap();
        assert_eq!(hamilton.best_lap_seconds, Some(74.345));
        let grosjean = rows.iter().find(|r| r.driver_name == "Romain Grosjean").unwrap();
        assert_eq!(grosjean.best_lap_seconds, None);
    }

    #[test]
    fn test_filter_by_drivers_empty_selection_yields_empty_table() {
        let rows = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );

        let filtered = filter_by_drivers(&rows, &HashSet::new());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_by_drivers_preserves_order() {
        let rows = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );
        let selected: HashSet<String> = ["Sebastian Vettel".to_string()].into_iter().collect();

        let filtered = filter_by_drivers(&rows, &selected);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].lap, 1);
        assert_eq!(filtered[1].lap, 2);
    }

    #[test]
    fn test_laps_at_lap_sorted_by_position() {
        let rows = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );

        let snapshot = laps_at_lap(&rows, 1);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].driver_name, "Sebastian Vettel");
        assert_eq!(snapshot[0].position, 1);
        assert_eq!(snapshot[1].driver_name, "Lewis Hamilton");
        assert_eq!(snapshot[1].position, 2);
    }

    #[test]
    fn test_laps_at_lap_out_of_range_is_empty() {
        let rows = prepare_laps(
            &sample_laps(),
            &sample_drivers(),
            &sample_constructors(),
            &sample_results(),
            RACE_ID,
        );

        assert!(laps_at_lap(&rows, 99).is_empty());
        assert!(laps_at_lap(&rows, 0).is_empty());
    }
}
