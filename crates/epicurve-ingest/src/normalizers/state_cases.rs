//! Per-state cumulative cases and deaths (`date,state,fips,cases,deaths`)

use super::{csv_reader, field, keyed_record, log_outcome, CsvHeader, SourceNormalizer};
use crate::error::{IngestError, IngestResult};
use crate::numeric::parse_numeric;
use epicurve_model::{RawRecord, Region, SourceKind};

/// Normalizer for the state-level case/death CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCasesNormalizer;

impl StateCasesNormalizer {
    /// Create new normalizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SourceNormalizer for StateCasesNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::StateCases
    }

    fn normalize(&self, document: &str) -> IngestResult<Vec<RawRecord>> {
        let kind = self.kind();
        let mut reader = csv_reader(document);
        let header = CsvHeader::read(kind, &mut reader)?;
        let date = header.require("date")?;
        let state = header.require("state")?;
        let cases = header.position("cases");
        let deaths = header.position("deaths");

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for row in reader.records() {
            let row = row.map_err(|e| IngestError::csv(kind, e))?;
            let (Some(raw_date), Some(region)) = (row.get(date), row.get(state)) else {
                dropped += 1;
                continue;
            };
            let Some(record) = keyed_record(kind, Region::new(region), raw_date) else {
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
