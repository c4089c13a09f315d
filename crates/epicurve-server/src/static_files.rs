//! Static file resolution
//!
//! Maps a raw request path onto a file under the root directory:
//!
//! 1. percent-decode the path
//! 2. strip a trailing `.orig`
//! 3. join the remaining segments under the root, refusing `..`
//! 4. a directory resolves to its index document
//!
//! Every failure is reported as [`ServeError::NotFound`] except a file that
//! exists but cannot be read.

use crate::error::{ServeError, ServeResult};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Suffix stripped from request paths before resolution
pub const ORIG_SUFFIX: &str = ".orig";

/// Content type of script sources
pub const SCRIPT_CONTENT_TYPE: &str = "text/javascript";

/// A resolved file ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    /// Path on disk
    pub path: PathBuf,
    /// Content type header value
    pub content_type: String,
    /// File contents
    pub body: Vec<u8>,
}

/// Files served from one root directory
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_document: String,
}

impl StaticFiles {
    /// Serve from `root`, resolving directories to `index_document`
    pub fn new(root: impl Into<PathBuf>, index_document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_document: index_document.into(),
        }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw request path to a path on disk
    ///
    /// # Errors
    /// `ServeError::NotFound` if the path does not decode, escapes the root,
    /// or names nothing on disk.
    pub async fn resolve(&self, request_path: &str) -> ServeResult<PathBuf> {
        let decoded = percent_decode_str(request_path)
            .decode_utf8()
            .map_err(|_| ServeError::not_found(request_path))?;
        let trimmed = decoded.strip_suffix(ORIG_SUFFIX).unwrap_or(&*decoded);

        let mut path = self.root.clone();
        for segment in trimmed.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => return Err(ServeError::not_found(&*decoded)),
                segment => path.push(segment),
            }
        }

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| ServeError::not_found(&*decoded))?;
        if metadata.is_dir() {
            path.push(&self.index_document);
        }
        Ok(path)
    }

    /// Resolve and read a request path
    ///
    /// # Errors
    /// As [`resolve`](Self::resolve); a missing index document is not found,
    /// any other read failure is `ServeError::Read`.
    pub async fn load(&self, request_path: &str) -> ServeResult<StaticFile> {
        let path = self.resolve(request_path).await?;
        let body = tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ServeError::not_found(request_path)
            } else {
                ServeError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        tracing::debug!(path = %path.display(), bytes = body.len(), "serving file");
        Ok(StaticFile {
            content_type: content_type(&path),
            path,
            body,
        })
    }
}

/// Content type for a file path
///
/// Script sources (`.js`, `.ts`) are always `text/javascript`; anything
/// else is guessed from the extension.
#[must_use]
pub fn content_type(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js" | "ts") => SCRIPT_CONTENT_TYPE.to_string(),
        _ => mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn site() -> (tempfile::TempDir, StaticFiles) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js").join("main.js"), "run()").unwrap();
        std::fs::write(dir.path().join("two words.txt"), "hi").unwrap();
        let files = StaticFiles::new(dir.path(), "index.html");
        (dir, files)
    }

    #[test]
    fn script_types_forced() {
        assert_eq!(content_type(Path::new("a/main.js")), "text/javascript");
        assert_eq!(content_type(Path::new("a/main.ts")), "text/javascript");
        assert_eq!(content_type(Path::new("index.html")), "text/html");
        assert_eq!(content_type(Path::new("data.json")), "application/json");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }

    #[tokio::test]
    async fn root_resolves_to_index() {
        let (dir, files) = site();
        assert_eq!(files.resolve("/").await.unwrap(), dir.path().join("index.html"));
    }

    #[tokio::test]
    async fn percent_encoded_path_decoded() {
        let (dir, files) = site();
        assert_eq!(
            files.resolve("/two%20words.txt").await.unwrap(),
            dir.path().join("two words.txt")
        );
    }

    #[tokio::test]
    async fn orig_suffix_stripped() {
        let (dir, files) = site();
        let file = files.load("/js/main.js.orig").await.unwrap();
        assert_eq!(file.path, dir.path().join("js").join("main.js"));
        assert_eq!(file.content_type, "text/javascript");
        assert_eq!(file.body, b"run()");
    }

    #[tokio::test]
    async fn parent_segments_rejected() {
        let (_dir, files) = site();
        for path in ["/../etc/passwd", "/js/../../secret", "/%2e%2e/secret", "/..%5Csecret"] {
            let err = files.resolve(path).await.unwrap_err();
            assert!(matches!(err, ServeError::NotFound { .. }), "{path}");
        }
    }

    #[tokio::test]
    async fn missing_file_not_found() {
        let (_dir, files) = site();
        assert!(matches!(
            files.load("/nope.html").await,
            Err(ServeError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn directory_without_index_not_found() {
        let (dir, files) = site();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        assert!(matches!(
            files.load("/empty/").await,
            Err(ServeError::NotFound { .. })
        ));
    }
}
