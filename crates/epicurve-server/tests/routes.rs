//! Route tests against a temporary static root

use epicurve_server::routes::{routes, NOT_FOUND_BODY};
use epicurve_server::StaticFiles;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use warp::http::StatusCode;

fn site() -> (tempfile::TempDir, Arc<StaticFiles>) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("index.html"), "<h1>curves</h1>").unwrap();
    std::fs::write(root.join("rawPopData.json"), "[]").unwrap();
    std::fs::create_dir_all(root.join("js")).unwrap();
    std::fs::write(root.join("js").join("index.js"), "draw();").unwrap();
    std::fs::write(root.join("js").join("charts.ts"), "export {};").unwrap();
    std::fs::create_dir_all(root.join("about")).unwrap();
    std::fs::write(root.join("about").join("index.html"), "about").unwrap();
    let files = Arc::new(StaticFiles::new(root, "index.html"));
    (dir, files)
}

fn content_type<B>(response: &warp::http::Response<B>) -> &str {
    response.headers()["content-type"].to_str().unwrap()
}

#[tokio::test]
async fn hi_answers_fixed_document() {
    let (_dir, files) = site();
    let res = warp::test::request().path("/hi").reply(&routes(files)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "text/plain");
    let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body, serde_json::json!({ "hi": "there" }));
}

#[tokio::test]
async fn root_serves_index_document() {
    let (_dir, files) = site();
    let res = warp::test::request().path("/").reply(&routes(files)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "text/html");
    assert_eq!(res.body().as_ref(), b"<h1>curves</h1>");
}

#[tokio::test]
async fn nested_directory_serves_its_index() {
    let (_dir, files) = site();
    let res = warp::test::request().path("/about").reply(&routes(files)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body().as_ref(), b"about");
}

#[tokio::test]
async fn scripts_are_javascript() {
    let (_dir, files) = site();
    let routes = routes(files);

    let js = warp::test::request().path("/js/index.js").reply(&routes).await;
    assert_eq!(content_type(&js), "text/javascript");
    assert_eq!(js.body().as_ref(), b"draw();");

    let ts = warp::test::request().path("/js/charts.ts").reply(&routes).await;
    assert_eq!(content_type(&ts), "text/javascript");
}

#[tokio::test]
async fn other_types_guessed() {
    let (_dir, files) = site();
    let res = warp::test::request()
        .path("/rawPopData.json")
        .reply(&routes(files))
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "application/json");
}

#[tokio::test]
async fn orig_suffix_serves_source_file() {
    let (_dir, files) = site();
    let res = warp::test::request()
        .path("/js/index.js.orig")
        .reply(&routes(files))
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "text/javascript");
    assert_eq!(res.body().as_ref(), b"draw();");
}

#[tokio::test]
async fn missing_file_is_404() {
    let (_dir, files) = site();
    let res = warp::test::request().path("/missing.css").reply(&routes(files)).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.body().as_ref(), NOT_FOUND_BODY.as_bytes());
}

#[tokio::test]
async fn traversal_is_404() {
    let (_dir, files) = site();
    let res = warp::test::request()
        .path("/%2E%2E/epicurve-secret.txt")
        .reply(&routes(files))
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.body().as_ref(), NOT_FOUND_BODY.as_bytes());
}
