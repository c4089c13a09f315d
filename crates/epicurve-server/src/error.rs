//! Error types for the static file responder

use std::path::PathBuf;

/// Static file responder error
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Request path does not name a servable file
    #[error("not found: {path}")]
    NotFound {
        /// Request path after decoding
        path: String,
    },

    /// File exists but could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// Resolved file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Listener could not be bound
    #[error("cannot bind listener: {0}")]
    Bind(#[from] warp::Error),
}

impl ServeError {
    /// Create not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

/// Result type alias
pub type ServeResult<T> = std::result::Result<T, ServeError>;
