//! Configuration
//!
//! Loaded from TOML; every field has a default so an empty file is a valid
//! configuration.
//!
//! ```toml
//! reference_year = 2019
//! national_region = "United States"
//!
//! [sources]
//! population = "static/rawPopData.json"
//!
//! [parameters]
//! smoothingDays = 14
//!
//! [server]
//! port = 8080
//! ```

use crate::error::{CoreError, CoreResult};
use epicurve_ingest::{DatasetSources, IngestOptions, DEFAULT_REFERENCE_YEAR};
use epicurve_model::{ParameterSet, Region};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port of the static file server
pub const DEFAULT_PORT: u16 = 8080;
/// Default document served for directory paths
pub const DEFAULT_INDEX_DOCUMENT: &str = "index.html";
/// Default static root
pub const DEFAULT_STATIC_ROOT: &str = "static";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpicurveConfig {
    /// Locations of the source documents
    pub sources: DatasetSources,
    /// Population table year
    pub reference_year: i32,
    /// Name of the national pseudo-region
    pub national_region: Region,
    /// Initial parameter set
    pub parameters: ParameterSet,
    /// Static file server settings
    pub server: ServerConfig,
}

impl Default for EpicurveConfig {
    fn default() -> Self {
        Self {
            sources: DatasetSources::default(),
            reference_year: DEFAULT_REFERENCE_YEAR,
            national_region: Region::national(),
            parameters: ParameterSet::default(),
            server: ServerConfig::default(),
        }
    }
}

impl EpicurveConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML text
    ///
    /// An initial region left at the built-in national name follows a
    /// renamed `national_region`.
    ///
    /// # Errors
    /// - `CoreError::ConfigParse` for malformed TOML
    /// - `CoreError::Parameter` if the initial parameters are out of domain
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let mut config: Self = toml::from_str(text)?;
        if config.parameters.region == Region::national() {
            config.parameters.region = config.national_region.clone();
        }
        config.parameters.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `CoreError::ConfigRead` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Options for dataset loading
    #[must_use]
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions::default()
            .with_reference_year(self.reference_year)
            .with_national_region(self.national_region.clone())
    }

    /// With source locations
    #[inline]
    #[must_use]
    pub fn with_sources(mut self, sources: DatasetSources) -> Self {
        self.sources = sources;
        self
    }

    /// With reference year
    #[inline]
    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// With initial parameters
    #[inline]
    #[must_use]
    pub fn with_parameters(mut self, parameters: ParameterSet) -> Self {
        self.parameters = parameters;
        self
    }

    /// With server settings
    #[inline]
    #[must_use]
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }
}

/// Static file server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory files are served from
    pub root: PathBuf,
    /// Listen port
    pub port: u16,
    /// Document served for directory paths
    pub index_document: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_STATIC_ROOT),
            port: DEFAULT_PORT,
            index_document: DEFAULT_INDEX_DOCUMENT.to_string(),
        }
    }
}

impl ServerConfig {
    /// With root directory
    #[inline]
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// With port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// With index document
    #[inline]
    #[must_use]
    pub fn with_index_document(mut self, index_document: impl Into<String>) -> Self {
        self.index_document = index_document.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicurve_ingest::SourceLocation;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(EpicurveConfig::from_toml_str("").unwrap(), EpicurveConfig::default());
    }

    #[test]
    fn defaults_match_interactive_session() {
        let config = EpicurveConfig::default();
        let d = &config.parameters.derivation;
        assert_eq!(d.smoothing_days, 7);
        assert_eq!(d.days, 18);
        assert_eq!(d.hospitalization_days, 9);
        assert_eq!(config.parameters.region.as_str(), "United States");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.reference_year, 2019);
    }

    #[test]
    fn partial_override() {
        let config = EpicurveConfig::from_toml_str(
            r#"
            reference_year = 2018

            [sources]
            population = "/data/pop.json"

            [parameters]
            smoothingDays = 14
            region = "Ohio"
            startDate = "2021-03-01"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.reference_year, 2018);
        assert_eq!(config.sources.population, SourceLocation::from("/data/pop.json"));
        assert!(config.sources.national.is_remote());
        assert_eq!(config.parameters.derivation.smoothing_days, 14);
        assert_eq!(config.parameters.derivation.days, 18);
        assert_eq!(config.parameters.region.as_str(), "Ohio");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.index_document, "index.html");
        assert_eq!(config.ingest_options().reference_year, 2018);
    }

    #[test]
    fn initial_region_follows_national_name() {
        let config = EpicurveConfig::from_toml_str("national_region = \"USA\"\n").unwrap();
        assert_eq!(config.parameters.region.as_str(), "USA");
        assert_eq!(config.ingest_options().national_region.as_str(), "USA");

        let config = EpicurveConfig::from_toml_str(
            "national_region = \"USA\"\n[parameters]\nregion = \"Ohio\"\n",
        )
        .unwrap();
        assert_eq!(config.parameters.region.as_str(), "Ohio");
    }

    #[test]
    fn out_of_domain_parameters_rejected() {
        let err = EpicurveConfig::from_toml_str("[parameters]\nmortality = 0.0\n").unwrap_err();
        assert!(matches!(err, CoreError::Parameter(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = EpicurveConfig::from_toml_str("reference_year = [").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "national_region = \"Nation\"").unwrap();
        let config = EpicurveConfig::load(file.path()).unwrap();
        assert_eq!(config.national_region.as_str(), "Nation");
    }

    #[test]
    fn load_missing_file() {
        let err = EpicurveConfig::load("/no/such/epicurve.toml").unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }
}
