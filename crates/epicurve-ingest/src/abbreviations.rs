//! Region abbreviation map
//!
//! Hospitalization data labels regions by postal abbreviation while the
//! case/death dataset uses full names. Resolution is partial: an unmapped
//! abbreviation yields `None` and the caller drops the record.

use crate::error::{IngestError, IngestResult};
use epicurve_model::Region;
use serde_json::Value;
use std::collections::HashMap;

/// Abbreviation → region name lookup
#[derive(Debug, Clone, Default)]
pub struct RegionAbbreviations {
    map: HashMap<String, Region>,
}

impl RegionAbbreviations {
    /// Build from `(abbreviation, name)` pairs
    #[must_use]
    pub fn from_pairs<I, A, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, N)>,
        A: Into<String>,
        N: Into<Region>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(abbr, name)| (abbr.into(), name.into()))
                .collect(),
        }
    }

    /// Parse a JSON object mapping abbreviations to names
    ///
    /// # Errors
    /// - `IngestError::Json` if the document is not JSON
    /// - `IngestError::UnexpectedShape` if it is not an object of strings
    pub fn parse(json: &str) -> IngestResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| IngestError::json("abbreviations", e))?;

        let Value::Object(entries) = value else {
            return Err(IngestError::unexpected_shape(
                "abbreviations",
                "expected an object of abbreviation to name",
            ));
        };

        let mut map = HashMap::with_capacity(entries.len());
        for (abbr, name) in entries {
            match name {
                Value::String(name) => {
                    map.insert(abbr, Region::new(name));
                }
                other => {
                    return Err(IngestError::unexpected_shape(
                        "abbreviations",
                        format!("value for '{abbr}' is not a string: {other}"),
                    ));
                }
            }
        }

        Ok(Self { map })
    }

    /// Resolve an abbreviation
    #[inline]
    #[must_use]
    pub fn resolve(&self, abbreviation: &str) -> Option<&Region> {
        self.map.get(abbreviation)
    }

    /// Number of known abbreviations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object() {
        let map = RegionAbbreviations::parse(r#"{"NY": "New York", "OH": "Ohio"}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("NY").unwrap().as_str(), "New York");
    }

    #[test]
    fn unmapped_abbreviation_is_none() {
        let map = RegionAbbreviations::from_pairs([("NY", "New York")]);
        assert!(map.resolve("PR").is_none());
        assert!(map.resolve("ny").is_none());
    }

    #[test]
    fn rejects_non_object() {
        let err = RegionAbbreviations::parse(r#"["NY"]"#).unwrap_err();
        assert!(matches!(err, IngestError::UnexpectedShape { .. }));
    }

    #[test]
    fn rejects_non_string_value() {
        let err = RegionAbbreviations::parse(r#"{"NY": 36}"#).unwrap_err();
        assert!(matches!(err, IngestError::UnexpectedShape { .. }));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = RegionAbbreviations::parse("{").unwrap_err();
        assert!(matches!(err, IngestError::Json { .. }));
    }
}
