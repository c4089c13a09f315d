//! Error types for epicurve values
//!
//! Parameter errors are the only failures the model raises: a malformed
//! numeric source field is never an error, it becomes NaN.

use crate::params::ParameterKind;

/// Errors raised while constructing or updating model values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Parameter name not recognised
    #[error("unknown parameter: '{0}'")]
    UnknownParameter(String),

    /// Value type does not match the parameter's declared type
    #[error("parameter {parameter} expects {expected}, got {actual}")]
    TypeMismatch {
        /// Parameter name
        parameter: &'static str,
        /// Declared kind
        expected: ParameterKind,
        /// Kind of the supplied value
        actual: &'static str,
    },

    /// Numeric value outside the parameter's domain
    #[error("parameter {parameter} out of domain: {value} ({reason})")]
    OutOfDomain {
        /// Parameter name
        parameter: &'static str,
        /// Rejected value
        value: f64,
        /// Domain description
        reason: &'static str,
    },

    /// Date string is not `YYYY-MM-DD`
    #[error("invalid date: '{0}'")]
    InvalidDate(String),

    /// Region name is blank
    #[error("region name must not be empty")]
    EmptyRegion,
}

impl ModelError {
    /// Create out-of-domain error
    #[inline]
    #[must_use]
    pub fn out_of_domain(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self::OutOfDomain {
            parameter,
            value,
            reason,
        }
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
