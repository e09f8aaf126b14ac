pub mod axis;
pub mod layout;
pub mod region;
pub mod scale;
pub mod types;

pub use axis::{Axis, AxisKind, AxisOrientation, AxisTransform, nice_extent};
pub use layout::{PlotLayout, Reservations, Spacing};
pub use region::{DeviceBand, OverlayRegion, PixelRect};
pub use scale::LinearScale;
pub use types::Viewport;
