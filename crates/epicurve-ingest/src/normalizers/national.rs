//! National cumulative cases and deaths (`date,cases,deaths`)
//!
//! These rows define the reference axis every regional series is re-indexed
//! onto. Vaccination and hospitalization figures for the nation are summed
//! later from per-state records.

use super::{csv_reader, field, keyed_record, log_outcome, CsvHeader, SourceNormalizer};
use crate::error::{IngestError, IngestResult};
use crate::numeric::parse_numeric;
use epicurve_model::{RawRecord, Region, SourceKind};

/// Normalizer for the national case/death CSV
#[derive(Debug, Clone)]
pub struct NationalNormalizer {
    national: Region,
}

impl NationalNormalizer {
    /// Create normalizer labelling rows with the national region name
    #[inline]
    #[must_use]
    pub fn new(national: Region) -> Self {
        Self { national }
    }
}

impl Default for NationalNormalizer {
    fn default() -> Self {
        Self::new(Region::national())
    }
}

impl SourceNormalizer for NationalNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::National
    }

    fn normalize(&self, document: &str) -> IngestResult<Vec<RawRecord>> {
        let kind = self.kind();
        let mut reader = csv_reader(document);
        let header = CsvHeader::read(kind, &mut reader)?;
        let date = header.require("date")?;
        let cases = header.position("cases");
        let deaths = header.position("deaths");

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for row in reader.records() {
            let row = row.map_err(|e| IngestError::csv(kind, e))?;
            let Some(record) = row
                .get(date)
                .and_then(|raw| keyed_record(kind, self.national.clone(), raw))
            else {
                dropped += 1;
                continue;
            };
            records.push(record.with_cases_and_deaths(
                parse_numeric(field(&row, cases)),
                parse_numeric(field(&row, deaths)),
            ));
        }

        log_outcome(kind, records.len(), dropped);
        Ok(records)
    }
}
