use serde::{Deserialize, Serialize};

use crate::core::AxisTransform;
use crate::error::{ChartError, ChartResult};

/// Domain-space rectangle highlighted by the hatched overlay.
///
/// `x_max` is an exclusive category bound. `y_min`/`y_max` are value-axis
/// bounds in whatever order the caller finds natural; the device rectangle is
/// normalized afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayRegion {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl OverlayRegion {
    #[must_use]
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (name, value) in [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "overlay bound `{name}` must be finite"
                )));
            }
        }
        Ok(())
    }

    /// Maps the four bounds through the given axis transforms.
    pub fn to_device(
        self,
        x_axis: &impl AxisTransform,
        y_axis: &impl AxisTransform,
    ) -> ChartResult<DeviceBand> {
        self.validate()?;
        Ok(DeviceBand {
            x1: x_axis.to_pixels(self.x_min)?,
            x2: x_axis.to_pixels(self.x_max)?,
            y1: y_axis.to_pixels(self.y_min)?,
            y2: y_axis.to_pixels(self.y_max)?,
        })
    }
}

impl Default for OverlayRegion {
    /// May through August, 5 to 25 degrees.
    fn default() -> Self {
        Self::new(4.0, 8.0, 25.0, 5.0)
    }
}

/// Raw device coordinates of an overlay region, in the bound order given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceBand {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl DeviceBand {
    /// Signed horizontal extent, `x2 - x1`.
    #[must_use]
    pub fn signed_width(self) -> f64 {
        self.x2 - self.x1
    }

    /// Signed vertical extent, `y2 - y1`. Negative when the value axis is not inverted
    /// relative to the bound order.
    #[must_use]
    pub fn signed_height(self) -> f64 {
        self.y2 - self.y1
    }

    #[must_use]
    pub fn normalized(self) -> PixelRect {
        PixelRect {
            x: self.x1.min(self.x2),
            y: self.y1.min(self.y2),
            width: self.signed_width().abs(),
            height: self.signed_height().abs(),
        }
    }
}

/// Axis-aligned device rectangle with a top-left origin and non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}
