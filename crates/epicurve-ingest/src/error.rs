//! Error types for the ingress boundary
//!
//! Only whole-document failures are errors: an unreadable location, a CSV
//! without a required column, a JSON document of the wrong shape. Individual
//! bad fields and unresolvable rows are absorbed by the normalizers.

use crate::fetch::SourceLocation;
use epicurve_model::SourceKind;
use std::path::PathBuf;

/// Errors while fetching or normalizing source documents
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// CSV document could not be read
    #[error("csv error in {kind} source: {source}")]
    Csv {
        kind: SourceKind,
        #[source]
        source: csv::Error,
    },

    /// JSON document could not be parsed
    #[error("json error in {document}: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Required column absent from a CSV header
    #[error("{kind} source is missing required column '{column}'")]
    MissingColumn {
        kind: SourceKind,
        column: &'static str,
    },

    /// Document parsed but has the wrong structure
    #[error("unexpected shape in {document}: {message}")]
    UnexpectedShape {
        document: &'static str,
        message: String,
    },

    /// IO error reading a local source
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("http error fetching {location}: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// Fetcher cannot serve this kind of location
    #[error("unsupported location for this fetcher: {0}")]
    UnsupportedLocation(SourceLocation),
}

impl IngestError {
    /// Create CSV error for a source
    #[inline]
    pub fn csv(kind: SourceKind, source: csv::Error) -> Self {
        Self::Csv { kind, source }
    }

    /// Create JSON error for a document
    #[inline]
    pub fn json(document: &'static str, source: serde_json::Error) -> Self {
        Self::Json { document, source }
    }

    /// Create shape error for a document
    #[inline]
    pub fn unexpected_shape(document: &'static str, message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            document,
            message: message.into(),
        }
    }

    /// Create IO error for path
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;
