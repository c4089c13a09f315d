//! Epicurve Pipeline
//!
//! The pure algorithmic core: joining normalized records onto the national
//! reference axis and deriving smoothed, lagged and per-capita metrics.
//!
//! Nothing in this crate performs IO. Every pass takes an immutable input and
//! returns a new value, so running the same derivation twice yields bitwise
//! identical output.
//!
//! # Example
//!
//! ```rust,ignore
//! use epicurve_pipeline::{DerivedMetricCalculator, RegionalSeriesBuilder, SourceTables};
//!
//! let builder = RegionalSeriesBuilder::new(tables, Region::national());
//! let snapshot = builder.build(&Region::new("Ohio"));
//! let calculator = DerivedMetricCalculator::new(DerivationParams::default())?;
//! let derived = calculator.derive(&snapshot, population.get(snapshot.region()));
//! ```

#![warn(unreachable_pub)]

pub mod accessor;
pub mod builder;
pub mod derive;

pub use builder::{RegionalSeriesBuilder, SourceTables};
pub use derive::{immunity_union, DerivedMetricCalculator, PER_100K};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
