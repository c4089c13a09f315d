//! Testing utilities for the epicurve workspace
//!
//! A small synthetic world: ten days of national data (2021-01-01 to
//! 2021-01-10), two regions `Alpha` and `Beta`, and matching vaccination,
//! hospitalization, population and abbreviation documents.

#![allow(missing_docs)]

use epicurve_model::{
    CalendarDate, CumulativeDay, CumulativeSeries, DateKey, RawRecord, Region,
};
use std::path::Path;

pub const STATE_CASES_CSV: &str = "\
date,state,fips,cases,deaths
2021-01-01,Alpha,01,5,0
2021-01-02,Alpha,01,15,0
2021-01-03,Alpha,01,30,1
2021-01-03,Beta,02,20,0
2021-01-04,Alpha,01,50,2
2021-01-04,Beta,02,35,1
2021-01-05,Alpha,01,75,3
2021-01-05,Beta,02,55,1
2021-01-06,Alpha,01,105,4
2021-01-06,Beta,02,80,2
2021-01-07,Alpha,01,140,6
2021-01-07,Beta,02,110,3
2021-01-08,Alpha,01,180,8
2021-01-08,Beta,02,145,5
2021-01-09,Alpha,01,225,10
2021-01-09,Beta,02,185,6
2021-01-10,Alpha,01,275,12
2021-01-10,Beta,02,230,8
not-a-date,Beta,02,1,1
";

pub const NATIONAL_CSV: &str = "\
date,cases,deaths
2021-01-01,10,0
2021-01-02,30,1
2021-01-03,60,2
2021-01-04,100,4
2021-01-05,150,6
2021-01-06,210,9
2021-01-07,280,12
2021-01-08,360,16
2021-01-09,450,20
2021-01-10,550,25
";

pub const VACCINATIONS_CSV: &str = "\
Province_State,Date,Vaccine_Type,FIPS,Country_Region,Doses_alloc,Doses_shipped,Doses_admin,Stage_One_Doses,Stage_Two_Doses
Alpha,2021-01-08,All,01,US,,,10,8,0
Alpha,2021-01-08,Pfizer,01,US,,,6,5,0
Alpha,2021-01-09,All,01,US,,,30,20,5
Alpha,2021-01-10,All,01,US,,,60,40,10
Beta,2021-01-09,All,02,US,,,20,15,2
Beta,2021-01-10,All,02,US,,,50,35,8
";

pub const HOSPITALIZATIONS_JSON: &str = r#"[
    {"state": "AL", "date": "2021-01-05T00:00:00.000", "inpatient_beds_used_covid": "3"},
    {"state": "AL", "date": "2021-01-06T00:00:00.000", "inpatient_beds_used_covid": "4"},
    {"state": "AL", "date": "2021-01-07T00:00:00.000", "inpatient_beds_used_covid": "5"},
    {"state": "AL", "date": "2021-01-08T00:00:00.000", "inpatient_beds_used_covid": "6"},
    {"state": "AL", "date": "2021-01-09T00:00:00.000", "inpatient_beds_used_covid": "7"},
    {"state": "AL", "date": "2021-01-10T00:00:00.000", "inpatient_beds_used_covid": "8"},
    {"state": "BE", "date": "2021-01-09T00:00:00.000", "inpatient_beds_used_covid": "2"},
    {"state": "BE", "date": "2021-01-10T00:00:00.000", "inpatient_beds_used_covid": "3"},
    {"state": "ZZ", "date": "2021-01-10T00:00:00.000", "inpatient_beds_used_covid": "99"}
]"#;

pub const POPULATION_JSON: &str = r#"[
    {"Year": 2018, "State": "Alpha", "Total Population": 90000},
    {"Year": 2019, "State": "Alpha", "Total Population": 100000},
    {"Year": 2019, "State": "Beta", "Total Population": 300000}
]"#;

pub const ABBREVIATIONS_JSON: &str = r#"{"AL": "Alpha", "BE": "Beta"}"#;

pub const STATE_CASES_FILE: &str = "us-states.csv";
pub const NATIONAL_FILE: &str = "us.csv";
pub const VACCINATIONS_FILE: &str = "vaccine_data_us_timeline.csv";
pub const HOSPITALIZATIONS_FILE: &str = "hospitalizations.json";
pub const POPULATION_FILE: &str = "rawPopData.json";
pub const ABBREVIATIONS_FILE: &str = "stateAbbreviationMap.json";

/// Number of days on the synthetic reference axis
pub const AXIS_DAYS: u32 = 10;

pub const ALPHA_POPULATION: u64 = 100_000;
pub const BETA_POPULATION: u64 = 300_000;

/// Write all six fixture documents into `dir` under the `*_FILE` names
pub fn write_documents(dir: &Path) -> std::io::Result<()> {
    for (name, content) in [
        (STATE_CASES_FILE, STATE_CASES_CSV),
        (NATIONAL_FILE, NATIONAL_CSV),
        (VACCINATIONS_FILE, VACCINATIONS_CSV),
        (HOSPITALIZATIONS_FILE, HOSPITALIZATIONS_JSON),
        (POPULATION_FILE, POPULATION_JSON),
        (ABBREVIATIONS_FILE, ABBREVIATIONS_JSON),
    ] {
        std::fs::write(dir.join(name), content)?;
    }
    Ok(())
}

pub fn date(year: i32, month: u32, day: u32) -> CalendarDate {
    CalendarDate::from_ymd_opt(year, month, day).unwrap()
}

/// Day `n` of the synthetic axis, counting from 1
pub fn axis_day(n: u32) -> CalendarDate {
    date(2021, 1, n)
}

/// `len` consecutive dates starting at `start`
pub fn dates_from(start: CalendarDate, len: usize) -> Vec<CalendarDate> {
    start.iter_days().take(len).collect()
}

/// National records whose dates form a reference axis of `len` days
pub fn reference_axis(region: &Region, start: CalendarDate, len: usize) -> Vec<RawRecord> {
    dates_from(start, len)
        .into_iter()
        .enumerate()
        .map(|(i, day)| {
            let i = i as f64;
            RawRecord::on(region.clone(), day).with_cases_and_deaths(10.0 * i, i)
        })
        .collect()
}

/// Cumulative series with the given case and death columns, starting at day 1
///
/// Remaining fields are zero.
pub fn cumulative_series(region: &str, cases: &[f64], deaths: &[f64]) -> CumulativeSeries {
    assert_eq!(cases.len(), deaths.len(), "columns must have equal length");
    let days = cases
        .iter()
        .zip(deaths)
        .enumerate()
        .map(|(i, (&c, &d))| {
            let day = date(2021, 1, 1) + chrono::Days::new(i as u64);
            CumulativeDay {
                cumulative_cases: c,
                cumulative_deaths: d,
                ..CumulativeDay::empty(day, DateKey::from_date(day))
            }
        })
        .collect();
    CumulativeSeries::new(Region::new(region), days)
}

/// Cumulative series where every field is generated from the day index
pub fn cumulative_series_with(
    region: &str,
    len: usize,
    fill: impl Fn(usize, &mut CumulativeDay),
) -> CumulativeSeries {
    let days = (0..len)
        .map(|i| {
            let day = date(2020, 6, 1) + chrono::Days::new(i as u64);
            let mut entry = CumulativeDay::empty(day, DateKey::from_date(day));
            fill(i, &mut entry);
            entry
        })
        .collect();
    CumulativeSeries::new(Region::new(region), days)
}

/// Assert two floats are equal, treating NaN as equal to NaN
#[track_caller]
pub fn assert_same_f64(actual: f64, expected: f64) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "expected NaN, got {actual}");
    } else {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }
}

/// Assert two float columns are equal, treating NaN as equal to NaN
#[track_caller]
pub fn assert_same_column(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "column lengths differ");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            assert!(a.is_nan(), "index {i}: expected NaN, got {a}");
        } else {
            assert!(
                (a - e).abs() <= 1e-9 * e.abs().max(1.0),
                "index {i}: expected {e}, got {a}"
            );
        }
    }
}
