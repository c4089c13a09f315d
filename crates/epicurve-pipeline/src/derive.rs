//! Derived metric calculator
//!
//! Turns a cumulative snapshot into a fully derived series for one parameter
//! set. The passes run in a fixed order:
//!
//! 1. daily deltas of cases, deaths and first doses
//! 2. smoothing: cumulative difference over the window for cases, deaths and
//!    first doses; trailing moving average for hospitalizations
//! 3. vaccines per 100k (before lag)
//! 4. missed-case multiplier, death and hospitalization lag, per-100k scaling
//! 5. cumulative percentages, including the immunity union
//!
//! NaN is propagated, never replaced. Percentages are not clamped.

use crate::accessor::{cumulative_before, offset, offset_or_nan};
use epicurve_model::{
    CumulativeSeries, DerivationParams, DerivedDay, DerivedSeries, ModelResult,
};

/// Per-100k scale
pub const PER_100K: f64 = 100_000.0;

/// Computes derived series for a fixed, validated parameter set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetricCalculator {
    params: DerivationParams,
}

impl DerivedMetricCalculator {
    /// Create calculator
    ///
    /// # Errors
    /// `ModelError::OutOfDomain` if a parameter is outside its domain.
    pub fn new(params: DerivationParams) -> ModelResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Parameters in use
    #[inline]
    #[must_use]
    pub fn params(&self) -> &DerivationParams {
        &self.params
    }

    /// Derive every metric of `series`
    ///
    /// Without a population every per-100k and percentage field is NaN.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn derive(&self, series: &CumulativeSeries, population: Option<u64>) -> DerivedSeries {
        let p = &self.params;
        let window = p.smoothing_days as usize;
        let population_f = population.map_or(f64::NAN, |n| n as f64);
        let per_100k = |value: f64| PER_100K * value / population_f;
        let percent = |value: f64| 100.0 * value / population_f;

        let cumulative_cases = series.column(|d| d.cumulative_cases);
        let cumulative_deaths = series.column(|d| d.cumulative_deaths);
        let cumulative_stage_one = series.column(|d| d.cumulative_stage_one);
        let hospitalizations = series.column(|d| d.hospitalizations);

        let daily_cases = daily_deltas(&cumulative_cases, DeltaStart::Cumulative);
        let daily_deaths = daily_deltas(&cumulative_deaths, DeltaStart::Cumulative);
        let daily_vaccines = daily_deltas(&cumulative_stage_one, DeltaStart::Zero);

        let smoothed_cases = smoothed_rate(&cumulative_cases, window);
        let smoothed_deaths = smoothed_rate(&cumulative_deaths, window);
        let smoothed_vaccines = smoothed_rate(&cumulative_stage_one, window);
        let smoothed_hospital = moving_average(&hospitalizations, window);

        let deaths = lagged(&smoothed_deaths, p.days);
        let hospital = lagged(&smoothed_hospital, p.hospitalization_days);

        let days = series
            .days()
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let cases = smoothed_cases[i] * p.missed_case_multiplier;
                let deaths_per_100k = per_100k(deaths[i]);
                let hospital_per_100k = per_100k(hospital[i]);

                let percent_vaccinated = percent(day.cumulative_stage_one);
                let percent_infected = percent(day.cumulative_cases * p.missed_case_multiplier);

                DerivedDay {
                    date: day.date,
                    raw_date_key: day.raw_date_key.clone(),

                    cumulative_cases: day.cumulative_cases,
                    cumulative_deaths: day.cumulative_deaths,
                    cumulative_stage_one: day.cumulative_stage_one,
                    cumulative_stage_two: day.cumulative_stage_two,
                    hospitalizations: day.hospitalizations,

                    daily_cases: daily_cases[i],
                    daily_deaths: daily_deaths[i],
                    daily_vaccines: daily_vaccines[i],

                    cases,
                    deaths: deaths[i],
                    vaccines: smoothed_vaccines[i],
                    hospital: hospital[i],

                    cases_per_100k: per_100k(cases),
                    deaths_per_100k,
                    hospital_per_100k,
                    vaccines_per_100k: per_100k(smoothed_vaccines[i]),
                    deaths_per_100k_scaled: deaths_per_100k * 100.0 / p.mortality,
                    hospital_per_100k_scaled: hospital_per_100k * p.hospitalization_factor,

                    percent_vaccinated,
                    percent_infected,
                    percent_deaths: percent(day.cumulative_deaths),
                    percent_immune: immunity_union(percent_vaccinated, percent_infected),
                }
            })
            .collect();

        tracing::trace!(region = %series.region(), days = series.len(), "derived series");
        DerivedSeries::new(series.region().clone(), population, self.params, days)
    }
}

/// Union of two independent percentages, unclamped
#[inline]
#[must_use]
pub fn immunity_union(percent_vaccinated: f64, percent_infected: f64) -> f64 {
    percent_vaccinated + percent_infected - percent_vaccinated * percent_infected / 100.0
}

#[derive(Debug, Clone, Copy)]
enum DeltaStart {
    /// First delta is the first cumulative value
    Cumulative,
    /// First delta is zero
    Zero,
}

fn daily_deltas(cumulative: &[f64], start: DeltaStart) -> Vec<f64> {
    (0..cumulative.len())
        .map(|i| match offset(cumulative, i, -1) {
            Some(previous) => cumulative[i] - previous,
            None => match start {
                DeltaStart::Cumulative => cumulative[i],
                DeltaStart::Zero => 0.0,
            },
        })
        .collect()
}

/// Average daily increase over the trailing window
#[allow(clippy::cast_precision_loss)]
fn smoothed_rate(cumulative: &[f64], window: usize) -> Vec<f64> {
    let divisor = window as f64;
    (0..cumulative.len())
        .map(|i| (cumulative[i] - cumulative_before(cumulative, i, window)) / divisor)
        .collect()
}

/// Trailing simple moving average; NaN until a full window is available
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let divisor = window as f64;
    (0..values.len())
        .map(|i| {
            (0..window)
                .map(|j| offset_or_nan(values, i, -(j as isize)))
                .sum::<f64>()
                / divisor
        })
        .collect()
}

/// Read each index from `lag` days later
fn lagged(values: &[f64], lag: u32) -> Vec<f64> {
    let delta = isize::try_from(lag).unwrap_or(isize::MAX);
    (0..values.len())
        .map(|i| offset_or_nan(values, i, delta))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicurve_test_utils::{assert_same_column, cumulative_series};

    fn params(smoothing_days: u32, days: u32, multiplier: f64) -> DerivationParams {
        DerivationParams {
            smoothing_days,
            days,
            missed_case_multiplier: multiplier,
            ..DerivationParams::default()
        }
    }

    #[test]
    fn rejects_zero_window() {
        assert!(DerivedMetricCalculator::new(params(0, 0, 1.0)).is_err());
    }

    #[test]
    fn window_of_one_scenario() {
        let series = cumulative_series("R", &[10.0, 20.0, 40.0, 70.0, 110.0], &[0.0; 5]);
        let calculator = DerivedMetricCalculator::new(params(1, 0, 1.0)).unwrap();
        let derived = calculator.derive(&series, Some(200_000));

        let cases: Vec<f64> = derived.days().iter().map(|d| d.cases).collect();
        assert_same_column(&cases, &[10.0, 10.0, 20.0, 30.0, 40.0]);

        let per_100k: Vec<f64> = derived.days().iter().map(|d| d.cases_per_100k).collect();
        assert_same_column(&per_100k, &[5.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn daily_deltas_start_from_cumulative() {
        assert_eq!(
            daily_deltas(&[3.0, 5.0, 9.0], DeltaStart::Cumulative),
            vec![3.0, 2.0, 4.0]
        );
        assert_eq!(daily_deltas(&[3.0, 5.0, 9.0], DeltaStart::Zero), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn smoothing_leaves_leading_gap() {
        let smoothed = smoothed_rate(&[2.0, 4.0, 6.0, 8.0, 10.0], 3);
        assert_same_column(&smoothed, &[f64::NAN, f64::NAN, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn moving_average_needs_full_window() {
        let averaged = moving_average(&[0.0, 0.0, 6.0, 0.0, 3.0], 2);
        assert_same_column(&averaged, &[f64::NAN, 0.0, 3.0, 3.0, 1.5]);
    }

    #[test]
    fn lag_reads_future_values() {
        assert_same_column(&lagged(&[1.0, 2.0, 3.0], 1), &[2.0, 3.0, f64::NAN]);
        assert_same_column(&lagged(&[1.0, 2.0, 3.0], 0), &[1.0, 2.0, 3.0]);
        assert!(lagged(&[1.0], u32::MAX)[0].is_nan());
    }

    #[test]
    fn missing_population_gives_nan_rates() {
        let series = cumulative_series("R", &[10.0, 20.0], &[1.0, 2.0]);
        let derived = DerivedMetricCalculator::new(params(1, 0, 1.0))
            .unwrap()
            .derive(&series, None);

        let day = &derived.days()[1];
        assert_eq!(day.cases, 10.0);
        assert!(day.cases_per_100k.is_nan());
        assert!(day.percent_infected.is_nan());
        assert!(derived.population().is_none());
    }

    #[test]
    fn scaled_rates_use_mortality_and_factor() {
        let mut series_params = params(1, 0, 1.0);
        series_params.mortality = 0.5;
        series_params.hospitalization_factor = 4.0;
        let series = epicurve_test_utils::cumulative_series_with("R", 2, |i, day| {
            day.cumulative_deaths = 10.0 * (i as f64 + 1.0);
            day.hospitalizations = 50.0;
        });
        let derived = DerivedMetricCalculator::new(series_params)
            .unwrap()
            .derive(&series, Some(100_000));

        let day = &derived.days()[1];
        assert_eq!(day.deaths_per_100k, 10.0);
        assert_eq!(day.deaths_per_100k_scaled, 2000.0);
        assert_eq!(day.hospital_per_100k, 50.0);
        assert_eq!(day.hospital_per_100k_scaled, 200.0);
    }

    #[test]
    fn immunity_union_is_unclamped() {
        assert_eq!(immunity_union(50.0, 50.0), 75.0);
        assert_eq!(immunity_union(0.0, 30.0), 30.0);
        assert!(immunity_union(150.0, 300.0) > 100.0);
    }
}
