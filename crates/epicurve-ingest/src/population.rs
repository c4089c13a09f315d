//! Population index
//!
//! Region → population for one reference year, plus the national
//! pseudo-region whose figure is the exact sum of the indexed regions. The
//! national figure is never taken from an external total, so "national" and
//! "sum of regions" per-100k views stay consistent.

use crate::error::{IngestError, IngestResult};
use crate::numeric::parse_json_numeric;
use epicurve_model::Region;
use indexmap::IndexMap;
use serde_json::Value;

/// Column holding the year
pub const YEAR_COLUMN: &str = "Year";
/// Column holding the region name
pub const REGION_COLUMN: &str = "State";
/// Column holding the population figure
pub const POPULATION_COLUMN: &str = "Total Population";

/// Year whose rows are indexed unless configured otherwise
pub const DEFAULT_REFERENCE_YEAR: i32 = 2019;

/// Region → population lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationIndex {
    national: Region,
    national_total: u64,
    regions: IndexMap<Region, u64>,
}

impl PopulationIndex {
    /// Build from per-region entries; a repeated region keeps its last value
    ///
    /// The national total counts each region once.
    ///
    /// # Errors
    /// `IngestError::UnexpectedShape` if the total does not fit in a `u64`.
    pub fn from_entries<I>(entries: I, national: Region) -> IngestResult<Self>
    where
        I: IntoIterator<Item = (Region, u64)>,
    {
        let mut regions = IndexMap::new();
        for (region, population) in entries {
            regions.insert(region, population);
        }
        let national_total = regions
            .values()
            .try_fold(0u64, |total, population| total.checked_add(*population))
            .ok_or_else(|| {
                IngestError::unexpected_shape("population", "combined population overflows")
            })?;
        Ok(Self {
            national,
            national_total,
            regions,
        })
    }

    /// Parse a population table (JSON array of row objects)
    ///
    /// Rows for other years are ignored. A row without a region name or with
    /// a population that is not a non-negative whole number is skipped.
    ///
    /// # Errors
    /// - `IngestError::Json` if the document is not JSON
    /// - `IngestError::UnexpectedShape` if it is not an array, or if the
    ///   combined population overflows
    pub fn parse(json: &str, reference_year: i32, national: Region) -> IngestResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| IngestError::json("population", e))?;
        let Value::Array(rows) = value else {
            return Err(IngestError::unexpected_shape(
                "population",
                "expected an array of rows",
            ));
        };

        let year = f64::from(reference_year);
        let mut skipped = 0usize;
        let entries: Vec<(Region, u64)> = rows
            .iter()
            .filter(|row| parse_json_numeric(row.get(YEAR_COLUMN)) == year)
            .filter_map(|row| {
                let entry = population_entry(row);
                if entry.is_none() {
                    skipped += 1;
                }
                entry
            })
            .collect();

        if skipped > 0 {
            tracing::warn!(skipped, reference_year, "skipped malformed population rows");
        }

        let index = Self::from_entries(entries, national)?;
        tracing::info!(
            regions = index.len(),
            national_total = index.national_total,
            reference_year,
            "built population index"
        );
        Ok(index)
    }

    /// Population of a region; the national name yields the combined total
    #[must_use]
    pub fn get(&self, region: &Region) -> Option<u64> {
        if region == &self.national {
            Some(self.national_total)
        } else {
            self.regions.get(region).copied()
        }
    }

    /// Combined population of all indexed regions
    #[inline]
    #[must_use]
    pub fn national_total(&self) -> u64 {
        self.national_total
    }

    /// Name of the national pseudo-region
    #[inline]
    #[must_use]
    pub fn national(&self) -> &Region {
        &self.national
    }

    /// Number of indexed regions (excluding the national entry)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no region was indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Indexed regions in table order
    pub fn regions(&self) -> impl Iterator<Item = (&Region, u64)> {
        self.regions.iter().map(|(region, population)| (region, *population))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn population_entry(row: &Value) -> Option<(Region, u64)> {
    let region = row.get(REGION_COLUMN)?.as_str()?;
    let population = parse_json_numeric(row.get(POPULATION_COLUMN));
    if !population.is_finite() || population < 0.0 || population.fract() != 0.0 {
        return None;
    }
    Some((Region::new(region), population as u64))
}
