//! HTTP routes
//!
//! `/hi` answers a fixed liveness document; everything else is a static
//! file lookup under the configured root.

use crate::error::ServeError;
use crate::static_files::{StaticFile, StaticFiles};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::{HeaderValue, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::path::FullPath;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Body of every not-found response
pub const NOT_FOUND_BODY: &str = "404 Not Found";

/// All routes of the static server
pub fn routes(
    files: Arc<StaticFiles>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    hi().or(static_files(files)).unify()
}

/// `GET /hi`
pub fn hi() -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path!("hi").map(|| {
        let body = serde_json::json!({ "hi": "there" }).to_string();
        warp::reply::with_header(body, CONTENT_TYPE, "text/plain").into_response()
    })
}

/// Any other path, served from `files`
pub fn static_files(
    files: Arc<StaticFiles>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path::full()
        .and(with_files(files))
        .and_then(serve_file)
}

fn with_files(
    files: Arc<StaticFiles>,
) -> impl Filter<Extract = (Arc<StaticFiles>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&files))
}

async fn serve_file(path: FullPath, files: Arc<StaticFiles>) -> Result<Response, Rejection> {
    match files.load(path.as_str()).await {
        Ok(file) => Ok(file_response(file)),
        Err(ServeError::NotFound { path }) => {
            tracing::debug!(%path, "not found");
            Ok(not_found())
        }
        Err(err) => {
            tracing::warn!(error = %err, "file read failed");
            Ok(not_found())
        }
    }
}

fn file_response(file: StaticFile) -> Response {
    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let mut response = Response::new(file.body.into());
    response.headers_mut().insert(CONTENT_TYPE, content_type);
    response
}

fn not_found() -> Response {
    warp::reply::with_status(NOT_FOUND_BODY, StatusCode::NOT_FOUND).into_response()
}
