//! Region identifiers
//!
//! A region is either a political subdivision (a state) or the synthetic
//! national aggregate. Names are compared by exact string equality, so every
//! source must be normalized onto the case/death dataset's spelling first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for the national aggregate when no other name is configured
pub const DEFAULT_NATIONAL_REGION: &str = "United States";

/// Region name as it appears in the case/death dataset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Create region from its display name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The default national aggregate pseudo-region
    #[inline]
    #[must_use]
    pub fn national() -> Self {
        Self::new(DEFAULT_NATIONAL_REGION)
    }

    /// Region name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Region {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a region is assembled from the sources
///
/// The national case/death source already aggregates cases and deaths, but
/// vaccination and hospitalization figures exist only per subdivision and have
/// to be summed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegionScope {
    /// National aggregate pseudo-region
    National(Region),
    /// A single subdivision
    Subdivision(Region),
}

impl RegionScope {
    /// Classify `region` against the configured national name
    #[must_use]
    pub fn classify(region: Region, national: &Region) -> Self {
        if &region == national {
            Self::National(region)
        } else {
            Self::Subdivision(region)
        }
    }

    /// The region this scope names
    #[inline]
    #[must_use]
    pub fn region(&self) -> &Region {
        match self {
            Self::National(region) | Self::Subdivision(region) => region,
        }
    }

    /// Whether this is the national aggregate
    #[inline]
    #[must_use]
    pub fn is_national(&self) -> bool {
        matches!(self, Self::National(_))
    }
}
