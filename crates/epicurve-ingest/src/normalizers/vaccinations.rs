//! Vaccination dose timeline
//!
//! `Date,Province_State,Vaccine_Type,Doses_admin,Stage_One_Doses,Stage_Two_Doses,...`
//! Only the `All` vaccine-type rows are kept; per-manufacturer rows would be
//! double counted.

use super::{csv_reader, field, keyed_record, log_outcome, CsvHeader, SourceNormalizer};
use crate::error::{IngestError, IngestResult};
use crate::numeric::parse_numeric;
use epicurve_model::{RawRecord, Region, SourceKind};

/// Vaccine type of the aggregate rows
pub const ALL_VACCINE_TYPES: &str = "All";

/// Normalizer for the vaccination timeline CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct VaccinationNormalizer;

impl VaccinationNormalizer {
    /// Create new normalizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SourceNormalizer for VaccinationNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::Vaccinations
    }

    fn normalize(&self, document: &str) -> IngestResult<Vec<RawRecord>> {
        let kind = self.kind();
        let mut reader = csv_reader(document);
        let header = CsvHeader::read(kind, &mut reader)?;
        let date = header.require("Date")?;
        let state = header.require("Province_State")?;
        let vaccine_type = header.require("Vaccine_Type")?;
        let doses = header.position("Doses_admin");
        let stage_one = header.position("Stage_One_Doses");
        let stage_two = header.position("Stage_Two_Doses");

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for row in reader.records() {
            let row = row.map_err(|e| IngestError::csv(kind, e))?;
            if row.get(vaccine_type).map(str::trim) != Some(ALL_VACCINE_TYPES) {
                continue;
            }
            let (Some(raw_date), Some(region)) = (row.get(date), row.get(state)) else {
                dropped += 1;
                continue;
            };
            let Some(record) = keyed_record(kind, Region::new(region), raw_date) else {
                dropped += 1;
                continue;
            };
            records.push(record.with_vaccinations(
                parse_numeric(field(&row, doses)),
                parse_numeric(field(&row, stage_one)),
                parse_numeric(field(&row, stage_two)),
            ));
        }

        log_outcome(kind, records.len(), dropped);
        Ok(records)
    }
}
