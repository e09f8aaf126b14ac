//! Decorations layered on top of a constructed chart.
//!
//! Extensions only talk to the chart through `LiveChart` and the scene
//! contract; they never reach into chart layout internals.

pub mod clip_id;
pub mod hatch_geometry;
pub mod hatch_overlay;

pub use clip_id::next_clip_id;
pub use hatch_geometry::{HatchLine, MAX_HATCH_LINES, hatch_line_count, hatch_lines};
pub use hatch_overlay::{
    HatchStyle, MAX_EXTRA_HATCH_LINES, MIN_HATCH_SPACING_PX, OverlayOutcome, OverlayRenderer,
    OverlayTable,
};
