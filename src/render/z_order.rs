//! Paint-order conventions for root-level scene groups.
//!
//! Root groups are painted by ascending `z_index`; ties keep insertion order.
//! The hatched overlay must stay above the grid and below every series.

/// Grid lines behind everything else in the plot area.
pub const GRID: i32 = -10;
/// Tinted overlay background.
pub const OVERLAY_FILL: i32 = 0;
/// Hatch lines, relative to the overlay group.
pub const OVERLAY_HATCH: i32 = 1;
/// Axis lines and ticks.
pub const AXIS: i32 = 2;
/// Series polylines and markers.
pub const SERIES: i32 = 10;
/// Titles, axis labels, legend and credits.
pub const LABELS: i32 = 20;
