//! Normalized source records
//!
//! Every source is normalized onto the same `{region, date, date_key}`
//! addressing scheme. Measurement fields a source does not carry stay `None`;
//! a field the source carries but that failed to parse is `Some(NaN)`.

use crate::date::DateKey;
use crate::region::Region;
use crate::CalendarDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four tabular sources joined by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Per-state cumulative cases and deaths
    StateCases,
    /// Per-state vaccination dose counts
    Vaccinations,
    /// Per-state hospitalization counts
    Hospitalizations,
    /// National cumulative cases and deaths (defines the reference axis)
    National,
}

impl SourceKind {
    /// All sources, in fetch order
    pub const ALL: [SourceKind; 4] = [
        SourceKind::StateCases,
        SourceKind::Vaccinations,
        SourceKind::Hospitalizations,
        SourceKind::National,
    ];

    /// Stable identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::StateCases => "state_cases",
            SourceKind::Vaccinations => "vaccinations",
            SourceKind::Hospitalizations => "hospitalizations",
            SourceKind::National => "national",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized row of a source dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Region the row belongs to
    pub region: Region,
    /// Parsed calendar date
    pub date: CalendarDate,
    /// Original date string, used as the join key
    pub raw_date_key: DateKey,
    /// Cumulative confirmed cases
    pub cumulative_cases: Option<f64>,
    /// Cumulative deaths
    pub cumulative_deaths: Option<f64>,
    /// Cumulative doses administered
    pub cumulative_doses: Option<f64>,
    /// Cumulative first doses
    pub cumulative_stage_one: Option<f64>,
    /// Cumulative second doses
    pub cumulative_stage_two: Option<f64>,
    /// Point-in-time hospitalized count
    pub hospitalized_count: Option<f64>,
}

impl RawRecord {
    /// Create a record with no measurements
    #[must_use]
    pub fn new(region: impl Into<Region>, date: CalendarDate, raw_date_key: DateKey) -> Self {
        Self {
            region: region.into(),
            date,
            raw_date_key,
            cumulative_cases: None,
            cumulative_deaths: None,
            cumulative_doses: None,
            cumulative_stage_one: None,
            cumulative_stage_two: None,
            hospitalized_count: None,
        }
    }

    /// Create a record keyed by a calendar date
    #[must_use]
    pub fn on(region: impl Into<Region>, date: CalendarDate) -> Self {
        Self::new(region, date, DateKey::from_date(date))
    }

    /// With cumulative cases and deaths
    #[inline]
    #[must_use]
    pub fn with_cases_and_deaths(mut self, cases: f64, deaths: f64) -> Self {
        self.cumulative_cases = Some(cases);
        self.cumulative_deaths = Some(deaths);
        self
    }

    /// With vaccination counts
    #[inline]
    #[must_use]
    pub fn with_vaccinations(mut self, doses: f64, stage_one: f64, stage_two: f64) -> Self {
        self.cumulative_doses = Some(doses);
        self.cumulative_stage_one = Some(stage_one);
        self.cumulative_stage_two = Some(stage_two);
        self
    }

    /// With hospitalized count
    #[inline]
    #[must_use]
    pub fn with_hospitalized(mut self, count: f64) -> Self {
        self.hospitalized_count = Some(count);
        self
    }
}
