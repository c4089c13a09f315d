//! Epicurve Core
//!
//! Interactive layer over the pipeline: configuration, the control surface,
//! the recompute controller and the render frames it produces.
//!
//! # Flow
//!
//! ```text
//! control input → parse_control_input → set_parameter → recompute → RenderFrame → Renderer
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use epicurve_core::{EpicurveConfig, LatestFrame, RecomputeController};
//! use epicurve_ingest::DefaultFetcher;
//!
//! let config = EpicurveConfig::load("epicurve.toml")?;
//! let mut controller =
//!     RecomputeController::load(&config, &DefaultFetcher::new(), LatestFrame::new()).await?;
//! controller.apply_control_input("smoothingDays", "14")?;
//! let frame = controller.renderer().frame();
//! ```

#![warn(unreachable_pub)]

pub mod charts;
pub mod config;
pub mod controller;
pub mod controls;
pub mod error;
pub mod render;

pub use charts::{Chart, ChartLine, ChartPoint, ChartSlot, LineSpec, MetricField, RenderFrame};
pub use config::{EpicurveConfig, ServerConfig};
pub use controller::RecomputeController;
pub use controls::{control_specs, parse_control_input, ControlSpec, ControlWidget, RangeBounds};
pub use error::{CoreError, CoreResult};
pub use render::{JsonFileRenderer, LatestFrame, Renderer};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the controller
    pub use crate::{
        ChartSlot, CoreError, CoreResult, EpicurveConfig, LatestFrame, RecomputeController,
        RenderFrame, Renderer,
    };
    pub use epicurve_model::{ParameterName, ParameterSet, ParameterValue, Region};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
