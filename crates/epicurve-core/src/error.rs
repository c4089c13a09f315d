//! Error types for the core
//!
//! Wraps the lower layers and adds the failures of the control surface,
//! configuration loading and rendering.

use epicurve_ingest::IngestError;
use epicurve_model::{ModelError, ParameterName, Region};
use std::path::PathBuf;

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Parameter rejected by the model
    #[error("invalid parameter: {0}")]
    Parameter(#[from] ModelError),

    /// Source data could not be loaded
    #[error("data loading failed: {0}")]
    Ingest(#[from] IngestError),

    /// Region is not one of the known regions
    #[error("unknown region: {0}")]
    UnknownRegion(Region),

    /// Raw control input could not be converted
    #[error("invalid input for {control}: '{input}'")]
    InvalidControlInput {
        /// Control the input was meant for
        control: ParameterName,
        /// Raw input
        input: String,
    },

    /// Numeric control input outside the control's range
    #[error("{control} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Control the input was meant for
        control: ParameterName,
        /// Rejected value
        value: f64,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Configuration file unreadable
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file malformed
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Render output could not be written
    #[error("render failed for {path}: {source}")]
    RenderIo {
        /// Output path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Render frame could not be serialized
    #[error("render serialization failed: {0}")]
    RenderJson(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the error came from user input rather than the environment
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Parameter(_)
                | Self::UnknownRegion(_)
                | Self::InvalidControlInput { .. }
                | Self::OutOfRange { .. }
        )
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
