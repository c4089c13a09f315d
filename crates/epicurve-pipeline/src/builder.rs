//! Regional series builder
//!
//! Re-indexes one region's records onto the national reference axis. Every
//! series gets exactly one day per reference date; a day without data keeps
//! zero in every field, and records dated off the axis are dropped.

use epicurve_model::{
    CalendarDate, CumulativeDay, CumulativeSeries, DateKey, RawRecord, Region, RegionScope,
};
use std::collections::HashMap;

/// Normalized records of the four tabular sources
#[derive(Debug, Clone, Copy)]
pub struct SourceTables<'a> {
    /// Per-state cumulative cases and deaths
    pub state_cases: &'a [RawRecord],
    /// Per-state vaccination counts
    pub vaccinations: &'a [RawRecord],
    /// Per-state hospitalization counts
    pub hospitalizations: &'a [RawRecord],
    /// National cases and deaths; their dates define the reference axis
    pub national: &'a [RawRecord],
}

/// Builds cumulative series for any region over a shared reference axis
#[derive(Debug)]
pub struct RegionalSeriesBuilder<'a> {
    tables: SourceTables<'a>,
    national: Region,
    axis: Vec<(CalendarDate, DateKey)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> RegionalSeriesBuilder<'a> {
    /// Create builder; the axis follows the order of the national records
    #[must_use]
    pub fn new(tables: SourceTables<'a>, national: Region) -> Self {
        let mut axis = Vec::with_capacity(tables.national.len());
        let mut index = HashMap::with_capacity(tables.national.len());
        for record in tables.national {
            let key = record.raw_date_key.as_str();
            if index.contains_key(key) {
                tracing::debug!(key, "duplicate reference date ignored");
                continue;
            }
            index.insert(key, axis.len());
            axis.push((record.date, record.raw_date_key.clone()));
        }

        Self {
            tables,
            national,
            axis,
            index,
        }
    }

    /// Number of days on the reference axis
    #[inline]
    #[must_use]
    pub fn axis_len(&self) -> usize {
        self.axis.len()
    }

    /// Name of the national pseudo-region
    #[inline]
    #[must_use]
    pub fn national(&self) -> &Region {
        &self.national
    }

    /// Build the cumulative snapshot of `region`
    #[must_use]
    pub fn build(&self, region: &Region) -> CumulativeSeries {
        let mut days: Vec<CumulativeDay> = self
            .axis
            .iter()
            .map(|(date, key)| CumulativeDay::empty(*date, key.clone()))
            .collect();

        let scope = RegionScope::classify(region.clone(), &self.national);
        let dropped = match &scope {
            RegionScope::National(region) => self.fill_national(region, &mut days),
            RegionScope::Subdivision(region) => self.fill_subdivision(region, &mut days),
        };
        if dropped > 0 {
            tracing::debug!(%region, dropped, "records outside the reference axis dropped");
        }

        CumulativeSeries::new(scope.region().clone(), days)
    }

    fn slot(&self, record: &RawRecord) -> Option<usize> {
        self.index.get(record.raw_date_key.as_str()).copied()
    }

    /// Overwrite each day with the region's own records
    fn fill_subdivision(&self, region: &Region, days: &mut [CumulativeDay]) -> usize {
        let mut dropped = 0;

        for record in of_region(self.tables.state_cases, region) {
            let Some(i) = self.slot(record) else {
                dropped += 1;
                continue;
            };
            overwrite(&mut days[i].cumulative_cases, record.cumulative_cases);
            overwrite(&mut days[i].cumulative_deaths, record.cumulative_deaths);
        }
        for record in of_region(self.tables.vaccinations, region) {
            let Some(i) = self.slot(record) else {
                dropped += 1;
                continue;
            };
            overwrite(&mut days[i].cumulative_doses, record.cumulative_doses);
            overwrite(&mut days[i].cumulative_stage_one, record.cumulative_stage_one);
            overwrite(&mut days[i].cumulative_stage_two, record.cumulative_stage_two);
        }
        for record in of_region(self.tables.hospitalizations, region) {
            let Some(i) = self.slot(record) else {
                dropped += 1;
                continue;
            };
            overwrite(&mut days[i].hospitalizations, record.hospitalized_count);
        }
        dropped
    }

    /// Cases and deaths from the national source, other metrics summed over regions
    fn fill_national(&self, region: &Region, days: &mut [CumulativeDay]) -> usize {
        let mut dropped = 0;

        for record in of_region(self.tables.national, region) {
            let Some(i) = self.slot(record) else {
                dropped += 1;
                continue;
            };
            overwrite(&mut days[i].cumulative_cases, record.cumulative_cases);
            overwrite(&mut days[i].cumulative_deaths, record.cumulative_deaths);
        }
        for record in self.tables.vaccinations {
            let Some(i) = self.slot(record) else {
                dropped += 1;
                continue;
            };
            accumulate(&mut days[i].cumulative_doses, record.cumulative_doses);
            accumulate(&mut days[i].cumulative_stage_one, record.cumulative_stage_one);
            accumulate(&mut days[i].cumulative_stage_two, record.cumulative_stage_two);
        }
        for record in self.tables.hospitalizations {
            let Some(i) = self.slot(record) else {
                dropped += 1;
                continue;
            };
            accumulate(&mut days[i].hospitalizations, record.hospitalized_count);
        }
        dropped
    }
}

fn of_region<'r>(
    records: &'r [RawRecord],
    region: &'r Region,
) -> impl Iterator<Item = &'r RawRecord> + 'r {
    records.iter().filter(move |record| &record.region == region)
}

#[inline]
fn overwrite(field: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Add a regional contribution; zero and unparseable values contribute nothing
#[inline]
fn accumulate(field: &mut f64, value: Option<f64>) {
    match value {
        Some(value) if value != 0.0 && !value.is_nan() => *field += value,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicurve_test_utils::{axis_day, reference_axis};
    use pretty_assertions::assert_eq;

    fn national_axis() -> Vec<RawRecord> {
        reference_axis(&Region::national(), axis_day(1), 5)
    }

    #[test]
    fn subdivision_overwrites_matching_days() {
        let national = national_axis();
        let cases = vec![
            RawRecord::on("Ohio", axis_day(2)).with_cases_and_deaths(4.0, 1.0),
            RawRecord::on("Iowa", axis_day(2)).with_cases_and_deaths(9.0, 9.0),
        ];
        let tables = SourceTables {
            state_cases: &cases,
            vaccinations: &[],
            hospitalizations: &[],
            national: &national,
        };
        let series = RegionalSeriesBuilder::new(tables, Region::national()).build(&Region::new("Ohio"));

        assert_eq!(series.len(), 5);
        assert_eq!(series.column(|d| d.cumulative_cases), vec![0.0, 4.0, 0.0, 0.0, 0.0]);
        assert_eq!(series.column(|d| d.cumulative_deaths), vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn off_axis_records_dropped() {
        let national = national_axis();
        let cases = vec![RawRecord::on("Ohio", axis_day(20)).with_cases_and_deaths(4.0, 1.0)];
        let tables = SourceTables {
            state_cases: &cases,
            vaccinations: &[],
            hospitalizations: &[],
            national: &national,
        };
        let series = RegionalSeriesBuilder::new(tables, Region::national()).build(&Region::new("Ohio"));

        assert_eq!(series.len(), 5);
        assert!(series.days().iter().all(|d| d.cumulative_cases == 0.0));
    }

    #[test]
    fn national_sums_vaccinations_and_hospitalizations() {
        let national = national_axis();
        let vaccinations = vec![
            RawRecord::on("Ohio", axis_day(3)).with_vaccinations(10.0, 6.0, 1.0),
            RawRecord::on("Iowa", axis_day(3)).with_vaccinations(5.0, 4.0, f64::NAN),
        ];
        let hospitalizations = vec![
            RawRecord::on("Ohio", axis_day(4)).with_hospitalized(7.0),
            RawRecord::on("Iowa", axis_day(4)).with_hospitalized(f64::NAN),
            RawRecord::on("Utah", axis_day(4)).with_hospitalized(2.0),
        ];
        let tables = SourceTables {
            state_cases: &[],
            vaccinations: &vaccinations,
            hospitalizations: &hospitalizations,
            national: &national,
        };
        let series = RegionalSeriesBuilder::new(tables, Region::national()).build(&Region::national());

        let day3 = &series.days()[2];
        assert_eq!(day3.cumulative_doses, 15.0);
        assert_eq!(day3.cumulative_stage_one, 10.0);
        assert_eq!(day3.cumulative_stage_two, 1.0);
        assert_eq!(series.days()[3].hospitalizations, 9.0);
        assert_eq!(series.days()[0].hospitalizations, 0.0);
    }

    #[test]
    fn national_cases_come_from_national_source() {
        let national = national_axis();
        let cases = vec![RawRecord::on("Ohio", axis_day(1)).with_cases_and_deaths(999.0, 999.0)];
        let tables = SourceTables {
            state_cases: &cases,
            vaccinations: &[],
            hospitalizations: &[],
            national: &national,
        };
        let series = RegionalSeriesBuilder::new(tables, Region::national()).build(&Region::national());
        assert_eq!(series.column(|d| d.cumulative_cases), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn malformed_present_value_propagates() {
        let national = national_axis();
        let cases = vec![RawRecord::on("Ohio", axis_day(1)).with_cases_and_deaths(f64::NAN, 0.0)];
        let tables = SourceTables {
            state_cases: &cases,
            vaccinations: &[],
            hospitalizations: &[],
            national: &national,
        };
        let series = RegionalSeriesBuilder::new(tables, Region::national()).build(&Region::new("Ohio"));
        assert!(series.days()[0].cumulative_cases.is_nan());
    }

    #[test]
    fn unknown_region_is_all_zero() {
        let national = national_axis();
        let tables = SourceTables {
            state_cases: &[],
            vaccinations: &[],
            hospitalizations: &[],
            national: &national,
        };
        let builder = RegionalSeriesBuilder::new(tables, Region::national());
        let series = builder.build(&Region::new("Atlantis"));
        assert_eq!(series.len(), builder.axis_len());
        assert_eq!(series.region().as_str(), "Atlantis");
        assert!(series.days().iter().all(|d| d.cumulative_cases == 0.0));
    }
}
