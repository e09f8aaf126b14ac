use serde::{Deserialize, Serialize};

use crate::core::{PixelRect, Viewport};
use crate::error::{ChartError, ChartResult};

/// Outer chart spacing in pixels, clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 10.0,
            bottom: 20.0,
            left: 10.0,
        }
    }
}

/// Space reserved around the plot area by titles, labels and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reservations {
    pub header: f64,
    pub footer: f64,
    pub left_gutter: f64,
    pub right_gutter: f64,
}

/// Resolved chart layout for one container size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub viewport: Viewport,
    pub plot: PixelRect,
}

impl PlotLayout {
    pub fn compute(
        viewport: Viewport,
        spacing: Spacing,
        reservations: Reservations,
    ) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let left = spacing.left + reservations.left_gutter;
        let top = spacing.top + reservations.header;
        let width = f64::from(viewport.width) - left - spacing.right - reservations.right_gutter;
        let height = f64::from(viewport.height) - top - spacing.bottom - reservations.footer;
        if width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Ok(Self {
            viewport,
            plot: PixelRect::new(left, top, width, height),
        })
    }
}
