//! Loading the synthetic fixture world from local files

use epicurve_ingest::{
    load_datasets, DatasetSources, FileFetcher, IngestError, IngestOptions, SourceLocation,
};
use epicurve_model::Region;
use epicurve_test_utils as fixtures;
use pretty_assertions::assert_eq;
use std::path::Path;

fn local_sources(dir: &Path) -> DatasetSources {
    let at = |name: &str| SourceLocation::Path(dir.join(name));
    DatasetSources::default()
        .with_state_cases(at(fixtures::STATE_CASES_FILE))
        .with_national(at(fixtures::NATIONAL_FILE))
        .with_vaccinations(at(fixtures::VACCINATIONS_FILE))
        .with_hospitalizations(at(fixtures::HOSPITALIZATIONS_FILE))
        .with_population(at(fixtures::POPULATION_FILE))
        .with_abbreviations(at(fixtures::ABBREVIATIONS_FILE))
}

#[tokio::test]
async fn loads_all_sources() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::write_documents(dir.path()).unwrap();

    let datasets = load_datasets(&FileFetcher, &local_sources(dir.path()), &IngestOptions::default())
        .await
        .unwrap();

    assert_eq!(datasets.national.len(), fixtures::AXIS_DAYS as usize);
    // the undated Beta row is dropped
    assert_eq!(datasets.state_cases.len(), 18);
    // Pfizer row filtered
    assert_eq!(datasets.vaccinations.len(), 5);
    // ZZ has no mapping
    assert_eq!(datasets.hospitalizations.len(), 8);

    let names: Vec<&str> = datasets.regions.iter().map(Region::as_str).collect();
    assert_eq!(names, ["United States", "Alpha", "Beta"]);

    assert_eq!(
        datasets.population.get(&Region::new("Alpha")),
        Some(fixtures::ALPHA_POPULATION)
    );
    assert_eq!(
        datasets.population.get(&Region::national()),
        Some(fixtures::ALPHA_POPULATION + fixtures::BETA_POPULATION)
    );
}

#[tokio::test]
async fn custom_national_name_and_year() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::write_documents(dir.path()).unwrap();

    let options = IngestOptions::default()
        .with_national_region("Nation")
        .with_reference_year(2018);
    let datasets = load_datasets(&FileFetcher, &local_sources(dir.path()), &options)
        .await
        .unwrap();

    assert_eq!(datasets.national_region.as_str(), "Nation");
    assert_eq!(datasets.regions[0].as_str(), "Nation");
    assert!(datasets.national.iter().all(|r| r.region.as_str() == "Nation"));
    assert_eq!(datasets.population.get(&Region::new("Nation")), Some(90_000));
    assert_eq!(datasets.population.get(&Region::new("Beta")), None);
}

#[tokio::test]
async fn missing_document_fails_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::write_documents(dir.path()).unwrap();
    std::fs::remove_file(dir.path().join(fixtures::VACCINATIONS_FILE)).unwrap();

    let err = load_datasets(&FileFetcher, &local_sources(dir.path()), &IngestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}

#[tokio::test]
async fn malformed_document_fails_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::write_documents(dir.path()).unwrap();
    std::fs::write(dir.path().join(fixtures::HOSPITALIZATIONS_FILE), "{\"not\": \"rows\"}").unwrap();

    let err = load_datasets(&FileFetcher, &local_sources(dir.path()), &IngestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::UnexpectedShape { .. }));
}
