//! Render sinks
//!
//! The controller pushes a [`RenderFrame`] to its [`Renderer`] after every
//! recompute. Any `FnMut(&RenderFrame)` closure is a renderer.

use crate::charts::RenderFrame;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Consumer of render frames
pub trait Renderer {
    /// Present one frame
    ///
    /// # Errors
    /// Sink-specific output failures.
    fn render(&mut self, frame: &RenderFrame) -> CoreResult<()>;
}

impl<F> Renderer for F
where
    F: FnMut(&RenderFrame),
{
    fn render(&mut self, frame: &RenderFrame) -> CoreResult<()> {
        self(frame);
        Ok(())
    }
}

/// Writes each frame as JSON to a file, replacing the previous frame
#[derive(Debug, Clone)]
pub struct JsonFileRenderer {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileRenderer {
    /// Create renderer writing to `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    /// With compact output
    #[inline]
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Output path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Renderer for JsonFileRenderer {
    fn render(&mut self, frame: &RenderFrame) -> CoreResult<()> {
        let json = frame.to_json(self.pretty)?;
        std::fs::write(&self.path, json).map_err(|source| CoreError::RenderIo {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            path = %self.path.display(),
            region = %frame.region,
            days = frame.days.len(),
            "wrote render frame"
        );
        Ok(())
    }
}

/// Keeps only the most recent frame
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    frame: Option<RenderFrame>,
    renders: usize,
}

impl LatestFrame {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame
    #[inline]
    #[must_use]
    pub fn frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }

    /// Take the most recent frame
    #[inline]
    pub fn take(&mut self) -> Option<RenderFrame> {
        self.frame.take()
    }

    /// Number of frames received
    #[inline]
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Renderer for LatestFrame {
    fn render(&mut self, frame: &RenderFrame) -> CoreResult<()> {
        self.frame = Some(frame.clone());
        self.renders += 1;
        Ok(())
    }
}
