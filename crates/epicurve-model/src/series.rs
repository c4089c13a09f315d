//! Regional series at each pipeline stage
//!
//! [`CumulativeSeries`] is the joined, parameter-independent snapshot of one
//! region. [`DerivedSeries`] is produced from it for one parameter set and is
//! discarded on the next recompute.

use crate::date::DateKey;
use crate::params::DerivationParams;
use crate::region::Region;
use crate::CalendarDate;
use serde::Serialize;

/// One day of a region with cumulative fields only
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeDay {
    /// Calendar date
    pub date: CalendarDate,
    /// Join key from the reference axis
    pub raw_date_key: DateKey,
    /// Cumulative confirmed cases
    pub cumulative_cases: f64,
    /// Cumulative deaths
    pub cumulative_deaths: f64,
    /// Cumulative doses administered
    pub cumulative_doses: f64,
    /// Cumulative first doses
    pub cumulative_stage_one: f64,
    /// Cumulative second doses
    pub cumulative_stage_two: f64,
    /// Point-in-time hospitalized count
    pub hospitalizations: f64,
}

impl CumulativeDay {
    /// Day with every measurement at zero
    #[must_use]
    pub fn empty(date: CalendarDate, raw_date_key: DateKey) -> Self {
        Self {
            date,
            raw_date_key,
            cumulative_cases: 0.0,
            cumulative_deaths: 0.0,
            cumulative_doses: 0.0,
            cumulative_stage_one: 0.0,
            cumulative_stage_two: 0.0,
            hospitalizations: 0.0,
        }
    }
}

/// A region re-indexed onto the reference axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeSeries {
    region: Region,
    days: Vec<CumulativeDay>,
}

impl CumulativeSeries {
    /// Create series from days already ordered along the reference axis
    #[inline]
    #[must_use]
    pub fn new(region: Region, days: Vec<CumulativeDay>) -> Self {
        Self { region, days }
    }

    /// Region of this series
    #[inline]
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Days in ascending date order
    #[inline]
    #[must_use]
    pub fn days(&self) -> &[CumulativeDay] {
        &self.days
    }

    /// Number of days
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the axis is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Project one field into a column
    #[must_use]
    pub fn column(&self, field: impl Fn(&CumulativeDay) -> f64) -> Vec<f64> {
        self.days.iter().map(field).collect()
    }
}

/// One fully derived day
///
/// NaN marks a missing value and must be drawn as a gap, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedDay {
    /// Calendar date on the reference axis
    pub date: CalendarDate,
    /// Join key as it appeared in the sources
    pub raw_date_key: DateKey,

    /// Cumulative reported cases
    pub cumulative_cases: f64,
    /// Cumulative reported deaths
    pub cumulative_deaths: f64,
    /// Cumulative first doses
    pub cumulative_stage_one: f64,
    /// Cumulative second doses
    pub cumulative_stage_two: f64,
    /// Hospitalized count on this day
    pub hospitalizations: f64,

    /// New cases since the previous day
    pub daily_cases: f64,
    /// New deaths since the previous day
    pub daily_deaths: f64,
    /// New first doses since the previous day
    pub daily_vaccines: f64,

    // smoothed, then multiplied and lagged
    /// Smoothed daily cases times the missed-case multiplier
    pub cases: f64,
    /// Smoothed daily deaths read from the death lag ahead
    pub deaths: f64,
    /// Smoothed daily first doses
    pub vaccines: f64,
    /// Hospitalization moving average read from the hospitalization lag ahead
    pub hospital: f64,

    /// `cases` per 100k
    pub cases_per_100k: f64,
    /// `deaths` per 100k
    pub deaths_per_100k: f64,
    /// `hospital` per 100k
    pub hospital_per_100k: f64,
    /// `vaccines` per 100k
    pub vaccines_per_100k: f64,
    /// Cases implied by deaths at the assumed mortality, per 100k
    pub deaths_per_100k_scaled: f64,
    /// Cases implied by hospitalizations, per 100k
    pub hospital_per_100k_scaled: f64,

    /// Share of the population with a first dose
    pub percent_vaccinated: f64,
    /// Share infected, with missed cases included
    pub percent_infected: f64,
    /// Share of the population deceased
    pub percent_deaths: f64,
    /// Union of the vaccinated and infected shares, unclamped
    pub percent_immune: f64,
}

/// All derived days of one region for one parameter set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSeries {
    region: Region,
    population: Option<u64>,
    params: DerivationParams,
    days: Vec<DerivedDay>,
}

impl DerivedSeries {
    /// Assemble a derived series
    #[inline]
    #[must_use]
    pub fn new(
        region: Region,
        population: Option<u64>,
        params: DerivationParams,
        days: Vec<DerivedDay>,
    ) -> Self {
        Self {
            region,
            population,
            params,
            days,
        }
    }

    /// Region of this series
    #[inline]
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Population used for normalization, if the region had one
    #[inline]
    #[must_use]
    pub fn population(&self) -> Option<u64> {
        self.population
    }

    /// Parameters this series was derived with
    #[inline]
    #[must_use]
    pub fn params(&self) -> &DerivationParams {
        &self.params
    }

    /// Days in ascending date order
    #[inline]
    #[must_use]
    pub fn days(&self) -> &[DerivedDay] {
        &self.days
    }

    /// Number of days
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the axis is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days on or after `start`
    #[must_use]
    pub fn since(&self, start: CalendarDate) -> &[DerivedDay] {
        let first = self.days.partition_point(|day| day.date < start);
        &self.days[first..]
    }
}
