//! Epicurve Server
//!
//! Static file responder for the chart page and its assets, plus the
//! pieces shared with the `epicurve` binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use epicurve_core::ServerConfig;
//! use epicurve_server::serve;
//!
//! serve(&ServerConfig::default().with_port(8080)).await?;
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod logging;
pub mod routes;
pub mod static_files;

pub use error::{ServeError, ServeResult};
pub use logging::{init_logging, LogFormat};
pub use routes::routes;
pub use static_files::{content_type, StaticFile, StaticFiles};

use epicurve_core::ServerConfig;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Serve the configured root until Ctrl-C
///
/// # Errors
/// `ServeError::Bind` if the port cannot be bound.
pub async fn serve(config: &ServerConfig) -> ServeResult<()> {
    let files = Arc::new(StaticFiles::new(&config.root, config.index_document.clone()));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let (bound, server) =
        warp::serve(routes(files)).try_bind_with_graceful_shutdown(addr, shutdown_signal())?;
    tracing::info!(addr = %bound, root = %config.root.display(), "serving static files");

    server.await;
    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    shutdown_on(tokio::signal::ctrl_c()).await;
}

async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
