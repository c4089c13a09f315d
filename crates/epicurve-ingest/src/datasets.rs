//! Loading the full set of source documents
//!
//! All six documents are fetched concurrently and the load fails as a whole if
//! any single fetch or whole-document parse fails. The resulting [`Datasets`]
//! is immutable for the lifetime of a session.

use crate::abbreviations::RegionAbbreviations;
use crate::error::IngestResult;
use crate::fetch::{SourceFetcher, SourceLocation};
use crate::normalizers::{
    HospitalizationNormalizer, NationalNormalizer, SourceNormalizer, StateCasesNormalizer,
    VaccinationNormalizer,
};
use crate::population::{PopulationIndex, DEFAULT_REFERENCE_YEAR};
use epicurve_model::{RawRecord, Region};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-state cumulative cases and deaths
pub const DEFAULT_STATE_CASES_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-states.csv";
/// National cumulative cases and deaths
pub const DEFAULT_NATIONAL_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us.csv";
/// Vaccination dose timeline
pub const DEFAULT_VACCINATIONS_URL: &str = "https://raw.githubusercontent.com/govex/COVID-19/master/data_tables/vaccine_data/us_data/time_series/vaccine_data_us_timeline.csv";
/// Hospitalization feed
pub const DEFAULT_HOSPITALIZATIONS_URL: &str =
    "https://healthdata.gov/resource/g62h-syeh.json?$limit=50000";
/// Population table
pub const DEFAULT_POPULATION_PATH: &str = "static/rawPopData.json";
/// Region abbreviation map
pub const DEFAULT_ABBREVIATIONS_PATH: &str = "static/stateAbbreviationMap.json";

/// Locations of the six source documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSources {
    /// Per-state cases and deaths CSV
    pub state_cases: SourceLocation,
    /// National cases and deaths CSV
    pub national: SourceLocation,
    /// Vaccination timeline CSV
    pub vaccinations: SourceLocation,
    /// Hospitalization JSON
    pub hospitalizations: SourceLocation,
    /// Population table JSON
    pub population: SourceLocation,
    /// Region abbreviation JSON
    pub abbreviations: SourceLocation,
}

impl Default for DatasetSources {
    fn default() -> Self {
        Self {
            state_cases: DEFAULT_STATE_CASES_URL.into(),
            national: DEFAULT_NATIONAL_URL.into(),
            vaccinations: DEFAULT_VACCINATIONS_URL.into(),
            hospitalizations: DEFAULT_HOSPITALIZATIONS_URL.into(),
            population: DEFAULT_POPULATION_PATH.into(),
            abbreviations: DEFAULT_ABBREVIATIONS_PATH.into(),
        }
    }
}

impl DatasetSources {
    /// Set the state cases location
    #[inline]
    #[must_use]
    pub fn with_state_cases(mut self, location: impl Into<SourceLocation>) -> Self {
        self.state_cases = location.into();
        self
    }

    /// Set the national location
    #[inline]
    #[must_use]
    pub fn with_national(mut self, location: impl Into<SourceLocation>) -> Self {
        self.national = location.into();
        self
    }

    /// Set the vaccination location
    #[inline]
    #[must_use]
    pub fn with_vaccinations(mut self, location: impl Into<SourceLocation>) -> Self {
        self.vaccinations = location.into();
        self
    }

    /// Set the hospitalization location
    #[inline]
    #[must_use]
    pub fn with_hospitalizations(mut self, location: impl Into<SourceLocation>) -> Self {
        self.hospitalizations = location.into();
        self
    }

    /// Set the population location
    #[inline]
    #[must_use]
    pub fn with_population(mut self, location: impl Into<SourceLocation>) -> Self {
        self.population = location.into();
        self
    }

    /// Set the abbreviation map location
    #[inline]
    #[must_use]
    pub fn with_abbreviations(mut self, location: impl Into<SourceLocation>) -> Self {
        self.abbreviations = location.into();
        self
    }
}

/// Unparsed text of every source document
#[derive(Debug, Clone, Default)]
pub struct RawDocuments {
    /// Per-state cases and deaths CSV
    pub state_cases: String,
    /// National cases and deaths CSV
    pub national: String,
    /// Vaccination timeline CSV
    pub vaccinations: String,
    /// Hospitalization JSON
    pub hospitalizations: String,
    /// Population table JSON
    pub population: String,
    /// Region abbreviation JSON
    pub abbreviations: String,
}

/// Options applied while turning documents into datasets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Population table year to index
    pub reference_year: i32,
    /// Name of the national pseudo-region
    pub national_region: Region,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            national_region: Region::national(),
        }
    }
}

impl IngestOptions {
    /// Set the reference year
    #[inline]
    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Set the national region name
    #[inline]
    #[must_use]
    pub fn with_national_region(mut self, region: impl Into<Region>) -> Self {
        self.national_region = region.into();
        self
    }
}

/// Every normalized source, ready for series building
#[derive(Debug, Clone)]
pub struct Datasets {
    /// Per-state case and death records
    pub state_cases: Vec<RawRecord>,
    /// Per-state vaccination records
    pub vaccinations: Vec<RawRecord>,
    /// Per-state hospitalization records
    pub hospitalizations: Vec<RawRecord>,
    /// National case and death records; their dates form the reference axis
    pub national: Vec<RawRecord>,
    /// Population lookup
    pub population: PopulationIndex,
    /// Selectable regions, national first
    pub regions: Vec<Region>,
    /// Name of the national pseudo-region
    pub national_region: Region,
}

impl Datasets {
    /// Normalize raw documents
    ///
    /// # Errors
    /// Any whole-document parse failure.
    pub fn from_documents(documents: &RawDocuments, options: &IngestOptions) -> IngestResult<Self> {
        let national_region = options.national_region.clone();
        let abbreviations = RegionAbbreviations::parse(&documents.abbreviations)?;
        let population = PopulationIndex::parse(
            &documents.population,
            options.reference_year,
            national_region.clone(),
        )?;

        let state_cases = StateCasesNormalizer.normalize(&documents.state_cases)?;
        let national =
            NationalNormalizer::new(national_region.clone()).normalize(&documents.national)?;
        let vaccinations = VaccinationNormalizer.normalize(&documents.vaccinations)?;
        let hospitalizations =
            HospitalizationNormalizer::new(&abbreviations).normalize(&documents.hospitalizations)?;

        let regions = region_list(&state_cases, &national_region);
        tracing::info!(
            regions = regions.len(),
            axis_days = national.len(),
            "datasets ready"
        );

        Ok(Self {
            state_cases,
            vaccinations,
            hospitalizations,
            national,
            population,
            regions,
            national_region,
        })
    }
}

/// Sorted distinct regions of the state source, national first
fn region_list(state_cases: &[RawRecord], national: &Region) -> Vec<Region> {
    let distinct: BTreeSet<&Region> = state_cases
        .iter()
        .map(|record| &record.region)
        .filter(|region| *region != national)
        .collect();
    std::iter::once(national.clone())
        .chain(distinct.into_iter().cloned())
        .collect()
}

/// Fetch all six documents concurrently
///
/// # Errors
/// The first fetch failure.
pub async fn fetch_documents<F>(fetcher: &F, sources: &DatasetSources) -> IngestResult<RawDocuments>
where
    F: SourceFetcher + ?Sized,
{
    let (state_cases, national, vaccinations, hospitalizations, population, abbreviations) = futures::try_join!(
        fetcher.fetch(&sources.state_cases),
        fetcher.fetch(&sources.national),
        fetcher.fetch(&sources.vaccinations),
        fetcher.fetch(&sources.hospitalizations),
        fetcher.fetch(&sources.population),
        fetcher.fetch(&sources.abbreviations),
    )?;

    Ok(RawDocuments {
        state_cases,
        national,
        vaccinations,
        hospitalizations,
        population,
        abbreviations,
    })
}

/// Fetch and normalize every source
///
/// # Errors
/// Any fetch failure or whole-document parse failure.
pub async fn load_datasets<F>(
    fetcher: &F,
    sources: &DatasetSources,
    options: &IngestOptions,
) -> IngestResult<Datasets>
where
    F: SourceFetcher + ?Sized,
{
    let documents = fetch_documents(fetcher, sources).await?;
    Datasets::from_documents(&documents, options)
}
