//! Source fetching
//!
//! A [`SourceLocation`] is either an `http(s)://` URL or a local path. The
//! [`SourceFetcher`] trait is the seam between the pipeline and the network;
//! [`DefaultFetcher`] dispatches to [`HttpFetcher`] or [`FileFetcher`].

use crate::error::{IngestError, IngestResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a source document lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceLocation {
    /// Remote document fetched over HTTP(S)
    Url(String),
    /// Local file
    Path(PathBuf),
}

impl SourceLocation {
    /// Whether the location is remote
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl From<String> for SourceLocation {
    fn from(raw: String) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw)
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

impl From<&str> for SourceLocation {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<SourceLocation> for String {
    fn from(location: SourceLocation) -> Self {
        location.to_string()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the text of a source document
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch the whole document at `location`
    async fn fetch(&self, location: &SourceLocation) -> IngestResult<String>;
}

/// Fetcher for remote documents
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create fetcher with a default client
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create fetcher sharing an existing client
    #[inline]
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, location: &SourceLocation) -> IngestResult<String> {
        let SourceLocation::Url(url) = location else {
            return Err(IngestError::UnsupportedLocation(location.clone()));
        };
        let http_error = |source| IngestError::Http {
            location: url.clone(),
            source,
        };

        tracing::debug!(%url, "fetching remote source");
        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)?;
        tracing::info!(%url, bytes = body.len(), "fetched remote source");
        Ok(body)
    }
}

/// Fetcher for local files
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl SourceFetcher for FileFetcher {
    async fn fetch(&self, location: &SourceLocation) -> IngestResult<String> {
        let SourceLocation::Path(path) = location else {
            return Err(IngestError::UnsupportedLocation(location.clone()));
        };
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| IngestError::io_error(path, e))?;
        tracing::info!(path = %path.display(), bytes = body.len(), "read local source");
        Ok(body)
    }
}

/// Fetcher dispatching on the location kind
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    /// Create new dispatching fetcher
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SourceFetcher for DefaultFetcher {
    async fn fetch(&self, location: &SourceLocation) -> IngestResult<String> {
        match location {
            SourceLocation::Url(_) => self.http.fetch(location).await,
            SourceLocation::Path(_) => self.file.fetch(location).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn classifies_locations() {
        assert!(SourceLocation::from("https://example.com/us.csv").is_remote());
        assert!(SourceLocation::from("http://localhost/us.csv").is_remote());
        assert!(!SourceLocation::from("static/rawPopData.json").is_remote());
    }

    #[test]
    fn location_display_roundtrip() {
        let location = SourceLocation::from("static/rawPopData.json");
        assert_eq!(String::from(location.clone()), "static/rawPopData.json");
        assert_eq!(SourceLocation::from(String::from(location.clone())), location);
    }

    #[tokio::test]
    async fn file_fetcher_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "date,cases,deaths\n").unwrap();

        let location = SourceLocation::Path(file.path().to_path_buf());
        let body = FileFetcher.fetch(&location).await.unwrap();
        assert_eq!(body, "date,cases,deaths\n");
    }

    #[tokio::test]
    async fn file_fetcher_missing_file_errors() {
        let location = SourceLocation::from("/definitely/not/here.csv");
        let err = FileFetcher.fetch(&location).await.unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[tokio::test]
    async fn fetchers_reject_foreign_locations() {
        let url = SourceLocation::from("https://example.com/us.csv");
        assert!(matches!(
            FileFetcher.fetch(&url).await,
            Err(IngestError::UnsupportedLocation(_))
        ));

        let path = SourceLocation::from("static/us.csv");
        assert!(matches!(
            HttpFetcher::new().fetch(&path).await,
            Err(IngestError::UnsupportedLocation(_))
        ));
    }

    #[tokio::test]
    async fn default_fetcher_reads_paths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let location = SourceLocation::Path(file.path().to_path_buf());
        assert_eq!(DefaultFetcher::new().fetch(&location).await.unwrap(), "[]");
    }
}
