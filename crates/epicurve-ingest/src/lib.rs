//! Epicurve Ingest
//!
//! The trusted ingress boundary of the pipeline. Source documents are fetched,
//! parsed and normalized into [`RawRecord`](epicurve_model::RawRecord)s here;
//! nothing past this crate ever sees raw text.
//!
//! # Sources
//!
//! | Source | Format | Normalizer |
//! |---|---|---|
//! | Per-state cases/deaths | CSV | [`StateCasesNormalizer`] |
//! | National cases/deaths | CSV | [`NationalNormalizer`] |
//! | Vaccinations | CSV | [`VaccinationNormalizer`] |
//! | Hospitalizations | JSON | [`HospitalizationNormalizer`] |
//! | Population | JSON | [`PopulationIndex`] |
//! | Region abbreviations | JSON | [`RegionAbbreviations`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use epicurve_ingest::{load_datasets, DatasetSources, DefaultFetcher, IngestOptions};
//!
//! let datasets = load_datasets(
//!     &DefaultFetcher::new(),
//!     &DatasetSources::default(),
//!     &IngestOptions::default(),
//! )
//! .await?;
//! println!("{} regions", datasets.regions.len());
//! ```

#![warn(unreachable_pub)]

pub mod abbreviations;
pub mod datasets;
pub mod error;
pub mod fetch;
pub mod normalizers;
pub mod numeric;
pub mod population;

pub use abbreviations::RegionAbbreviations;
pub use datasets::{
    fetch_documents, load_datasets, DatasetSources, Datasets, IngestOptions, RawDocuments,
};
pub use error::{IngestError, IngestResult};
pub use fetch::{DefaultFetcher, FileFetcher, HttpFetcher, SourceFetcher, SourceLocation};
pub use normalizers::{
    HospitalizationNormalizer, NationalNormalizer, SourceNormalizer, StateCasesNormalizer,
    VaccinationNormalizer,
};
pub use population::{PopulationIndex, DEFAULT_REFERENCE_YEAR};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for loading datasets
    pub use crate::{
        load_datasets, DatasetSources, Datasets, DefaultFetcher, IngestError, IngestOptions,
        IngestResult, PopulationIndex, SourceFetcher, SourceLocation,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
