//! Source normalizers
//!
//! One normalizer per source converts a raw document into [`RawRecord`]s that
//! share the `{region, date, raw_date_key}` addressing scheme:
//! - State cases and national cases (CSV)
//! - Vaccination doses (CSV)
//! - Hospitalizations (JSON, abbreviated region labels)
//!
//! Columns are looked up by header name; columns a normalizer does not use are
//! ignored.

use crate::error::{IngestError, IngestResult};
use epicurve_model::{DateKey, RawRecord, Region, SourceKind};
use std::collections::HashMap;

mod hospitalizations;
mod national;
mod state_cases;
mod vaccinations;

pub use hospitalizations::HospitalizationNormalizer;
pub use national::NationalNormalizer;
pub use state_cases::StateCasesNormalizer;
pub use vaccinations::VaccinationNormalizer;

/// Converts one raw source document into normalized records
///
/// Implementations must not fail on individual bad fields or rows; only a
/// document that cannot be read as a whole is an error.
pub trait SourceNormalizer {
    /// Source this normalizer handles
    fn kind(&self) -> SourceKind;

    /// Normalize a whole document
    ///
    /// # Errors
    /// Whole-document failures (unreadable CSV, missing required column,
    /// wrong JSON shape).
    fn normalize(&self, document: &str) -> IngestResult<Vec<RawRecord>>;
}

/// Column positions of a CSV header
#[derive(Debug)]
pub(crate) struct CsvHeader {
    kind: SourceKind,
    positions: HashMap<String, usize>,
}

impl CsvHeader {
    /// Read the header row
    pub(crate) fn read(kind: SourceKind, reader: &mut csv::Reader<&[u8]>) -> IngestResult<Self> {
        let headers = reader.headers().map_err(|e| IngestError::csv(kind, e))?;
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        Ok(Self { kind, positions })
    }

    /// Position of a column that must exist
    pub(crate) fn require(&self, column: &'static str) -> IngestResult<usize> {
        self.position(column).ok_or(IngestError::MissingColumn {
            kind: self.kind,
            column,
        })
    }

    /// Position of a column that may be absent
    pub(crate) fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

/// CSV reader tolerant of ragged rows
pub(crate) fn csv_reader(document: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(document.as_bytes())
}

/// Field of a row at an optional position
pub(crate) fn field(row: &csv::StringRecord, position: Option<usize>) -> Option<&str> {
    position.and_then(|i| row.get(i))
}

/// Start a record if the date key parses
///
/// A record whose date cannot be parsed could never be placed on the
/// reference axis, so it is dropped here.
pub(crate) fn keyed_record(kind: SourceKind, region: Region, raw_date: &str) -> Option<RawRecord> {
    let key = DateKey::new(raw_date.trim());
    match key.to_date() {
        Ok(date) => Some(RawRecord::new(region, date, key)),
        Err(_) => {
            tracing::debug!(%kind, raw_date, "dropping record with unparseable date");
            None
        }
    }
}

/// Log the outcome of a normalization pass
pub(crate) fn log_outcome(kind: SourceKind, kept: usize, dropped: usize) {
    if dropped > 0 {
        tracing::info!(%kind, kept, dropped, "normalized source (some records dropped)");
    } else {
        tracing::info!(%kind, kept, "normalized source");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicurve_model::CalendarDate;

    #[test]
    fn header_positions_by_name() {
        let doc = "date,state,cases\n2021-01-01,Ohio,5\n";
        let mut reader = csv_reader(doc);
        let header = CsvHeader::read(SourceKind::StateCases, &mut reader).unwrap();
        assert_eq!(header.require("state").unwrap(), 1);
        assert!(header.position("deaths").is_none());
        assert!(matches!(
            header.require("deaths"),
            Err(IngestError::MissingColumn { column: "deaths", .. })
        ));
    }

    #[test]
    fn keyed_record_drops_bad_dates() {
        assert!(keyed_record(SourceKind::StateCases, Region::new("Ohio"), "2021-13-01").is_none());
        let record =
            keyed_record(SourceKind::StateCases, Region::new("Ohio"), "2021-01-02").unwrap();
        assert_eq!(record.date, CalendarDate::from_ymd_opt(2021, 1, 2).unwrap());
    }

    #[test]
    fn field_missing_position_is_none() {
        let row = csv::StringRecord::from(vec!["a", "b"]);
        assert_eq!(field(&row, Some(1)), Some("b"));
        assert_eq!(field(&row, Some(5)), None);
        assert_eq!(field(&row, None), None);
    }
}
