//! Epicurve Model
//!
//! Strongly typed values that flow through the epidemiological pipeline.
//!
//! # Stages
//!
//! ```text
//! RawRecord (per source) → CumulativeDay (joined on the reference axis) → DerivedDay
//! ```
//!
//! Each stage is a distinct type and each pass produces a new value; nothing is
//! mutated across recomputations.
//!
//! - [`RawRecord`]: one normalized row of a source dataset, keyed by region and date
//! - [`CumulativeSeries`]: one region re-indexed onto the national reference axis
//! - [`DerivedSeries`]: smoothed, lagged and per-capita metrics for one region
//! - [`ParameterSet`]: the immutable set of user-adjustable parameters
//!
//! # Example
//!
//! ```rust,ignore
//! use epicurve_model::{ParameterName, ParameterSet, ParameterValue};
//!
//! let params = ParameterSet::default()
//!     .with_parameter(ParameterName::SmoothingDays, ParameterValue::Number(14.0))?;
//! assert_eq!(params.derivation.smoothing_days, 14);
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod date;
pub mod error;
pub mod params;
pub mod record;
pub mod region;
pub mod series;

// Re-exports for convenience
pub use date::DateKey;
pub use error::{ModelError, ModelResult};
pub use params::{
    DerivationParams, ParameterKind, ParameterName, ParameterSet, ParameterValue,
};
pub use record::{RawRecord, SourceKind};
pub use region::{Region, RegionScope, DEFAULT_NATIONAL_REGION};
pub use series::{CumulativeDay, CumulativeSeries, DerivedDay, DerivedSeries};

/// Calendar date used on every time axis
pub type CalendarDate = chrono::NaiveDate;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with epicurve values
    pub use crate::{
        CalendarDate, CumulativeDay, CumulativeSeries, DateKey, DerivationParams, DerivedDay,
        DerivedSeries, ParameterName, ParameterSet, ParameterValue, RawRecord, Region,
        RegionScope,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
