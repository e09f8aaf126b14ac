//! climate-chart: monthly temperature chart with a hatched highlight band.
//!
//! The crate is split into a small retained scene-graph renderer
//! (`render`), axis and layout math (`core`), the overlay decoration
//! (`extensions`) and the environment-aware chart host (`api`).

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartHost, HostConfig, RenderingCapability};
pub use error::{ChartError, ChartResult};
