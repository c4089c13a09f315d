//! Hospitalization counts (JSON rows with abbreviated region labels)
//!
//! Rows look like `{"state": "NY", "date": "2020-07-20T00:00:00.000",
//! "inpatient_beds_used_covid": "812", ...}`. The join key is the date part
//! of the timestamp. A row whose abbreviation does not resolve is discarded so
//! that no partially keyed record reaches the join.

use super::{keyed_record, log_outcome, SourceNormalizer};
use crate::abbreviations::RegionAbbreviations;
use crate::error::{IngestError, IngestResult};
use crate::numeric::parse_json_numeric;
use epicurve_model::{RawRecord, SourceKind};
use serde_json::Value;

/// Field with the region abbreviation
pub const STATE_FIELD: &str = "state";
/// Field with the report timestamp
pub const DATE_FIELD: &str = "date";
/// Field with the hospitalized count
pub const COUNT_FIELD: &str = "inpatient_beds_used_covid";

/// Normalizer for the hospitalization JSON feed
#[derive(Debug, Clone, Copy)]
pub struct HospitalizationNormalizer<'a> {
    abbreviations: &'a RegionAbbreviations,
}

impl<'a> HospitalizationNormalizer<'a> {
    /// Create normalizer resolving labels through `abbreviations`
    #[inline]
    #[must_use]
    pub fn new(abbreviations: &'a RegionAbbreviations) -> Self {
        Self { abbreviations }
    }

    fn normalize_row(&self, row: &Value) -> Option<RawRecord> {
        let abbreviation = row.get(STATE_FIELD)?.as_str()?;
        let Some(region) = self.abbreviations.resolve(abbreviation) else {
            tracing::debug!(abbreviation, "dropping hospitalization row with unmapped region");
            return None;
        };
        let timestamp = row.get(DATE_FIELD)?.as_str()?;
        let raw_date = timestamp.get(..10).unwrap_or(timestamp);
        let record = keyed_record(self.kind(), region.clone(), raw_date)?;
        Some(record.with_hospitalized(parse_json_numeric(row.get(COUNT_FIELD))))
    }
}

impl SourceNormalizer for HospitalizationNormalizer<'_> {
    fn kind(&self) -> SourceKind {
        SourceKind::Hospitalizations
    }

    fn normalize(&self, document: &str) -> IngestResult<Vec<RawRecord>> {
        let value: Value =
            serde_json::from_str(document).map_err(|e| IngestError::json("hospitalizations", e))?;
        let Value::Array(rows) = value else {
            return Err(IngestError::unexpected_shape(
                "hospitalizations",
                "expected an array of rows",
            ));
        };

        let records: Vec<RawRecord> = rows.iter().filter_map(|row| self.normalize_row(row)).collect();
        log_outcome(self.kind(), records.len(), rows.len() - records.len());
        Ok(records)
    }
}
