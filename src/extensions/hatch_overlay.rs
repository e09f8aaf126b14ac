use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::api::{ChartId, LiveChart};
use crate::core::{OverlayRegion, PixelRect};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{hatch_lines, next_clip_id};
use crate::render::{Color, NodeId, SceneRenderer, segment_path, z_order};

/// Narrowest stroke spacing a style may request.
pub const MIN_HATCH_SPACING_PX: f64 = 1.0;
/// Most strokes a style may add past the covering count.
pub const MAX_EXTRA_HATCH_LINES: usize = 64;

/// Visual parameters of the hatched band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatchStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub spacing_px: f64,
    pub extra_lines: usize,
}

impl Default for HatchStyle {
    fn default() -> Self {
        Self {
            fill: Color::rgba8(173, 216, 250, 0.7),
            stroke: Color::rgba8(249, 252, 253, 0.95),
            stroke_width: 1.0,
            spacing_px: 12.0,
            extra_lines: 5,
        }
    }
}

impl HatchStyle {
    pub fn validate(self) -> ChartResult<()> {
        self.fill.validate()?;
        self.stroke.validate()?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "hatch stroke width must be finite and > 0".to_owned(),
            ));
        }
        if !self.spacing_px.is_finite() || self.spacing_px < MIN_HATCH_SPACING_PX {
            return Err(ChartError::InvalidData(format!(
                "hatch spacing must be finite and >= {MIN_HATCH_SPACING_PX} px"
            )));
        }
        if self.extra_lines > MAX_EXTRA_HATCH_LINES {
            return Err(ChartError::InvalidData(format!(
                "hatch extra lines must be <= {MAX_EXTRA_HATCH_LINES}"
            )));
        }
        Ok(())
    }
}

/// Side table owning the current overlay group of each live chart.
#[derive(Debug, Default)]
pub struct OverlayTable {
    groups: HashMap<ChartId, NodeId>,
}

impl OverlayTable {
    #[must_use]
    pub fn get(&self, chart: ChartId) -> Option<NodeId> {
        self.groups.get(&chart).copied()
    }

    /// Records `group` for `chart`, returning the handle it replaces.
    pub fn insert(&mut self, chart: ChartId, group: NodeId) -> Option<NodeId> {
        self.groups.insert(chart, group)
    }

    pub fn remove(&mut self, chart: ChartId) -> Option<NodeId> {
        self.groups.remove(&chart)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Result of one overlay pass. Failures are already logged when this is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayOutcome {
    Drawn {
        group: NodeId,
        rect: PixelRect,
        line_count: usize,
    },
    /// The chart exposes no x or no y axis.
    Skipped,
    Failed,
}

impl OverlayOutcome {
    #[must_use]
    pub fn is_drawn(self) -> bool {
        matches!(self, Self::Drawn { .. })
    }
}

/// Draws a tinted, diagonally hatched band over a chart.
///
/// Every call replaces the chart's previous overlay group, so at most one
/// overlay subtree exists per chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayRenderer {
    region: OverlayRegion,
    style: HatchStyle,
}

impl OverlayRenderer {
    #[must_use]
    pub fn new(region: OverlayRegion, style: HatchStyle) -> Self {
        Self { region, style }
    }

    #[must_use]
    pub fn region(&self) -> OverlayRegion {
        self.region
    }

    #[must_use]
    pub fn style(&self) -> HatchStyle {
        self.style
    }

    /// Draws the overlay, swallowing and logging any failure.
    pub fn render<C: LiveChart>(&self, chart: &mut C, table: &mut OverlayTable) -> OverlayOutcome {
        if chart.x_axes().is_empty() || chart.y_axes().is_empty() {
            debug!(chart = chart.id().raw(), "chart has no axes, skipping overlay");
            return OverlayOutcome::Skipped;
        }

        match self.try_render(chart, table) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    chart = chart.id().raw(),
                    error = %err,
                    "error creating hatched area"
                );
                OverlayOutcome::Failed
            }
        }
    }

    fn try_render<C: LiveChart>(
        &self,
        chart: &mut C,
        table: &mut OverlayTable,
    ) -> ChartResult<OverlayOutcome> {
        let chart_id = chart.id();
        if let Some(previous) = table.remove(chart_id) {
            let scene = chart.scene_mut();
            if scene.contains(previous) {
                scene.destroy(previous)?;
            }
        }

        let band = self.region.to_device(&chart.x_axes()[0], &chart.y_axes()[0])?;
        let rect = band.normalized();
        let lines = hatch_lines(rect, self.style.spacing_px, self.style.extra_lines)?;

        let scene = chart.scene_mut();
        let group = scene.g().z_index(z_order::OVERLAY_FILL).add()?;
        table.insert(chart_id, group);

        scene
            .rect(rect)
            .fill(self.style.fill)
            .z_index(0)
            .add_to(group)?;

        let clip_id = next_clip_id();
        scene.define_clip_rect(&clip_id, rect)?;
        let lines_group = scene
            .g()
            .clip_path(clip_id)
            .z_index(z_order::OVERLAY_HATCH)
            .add_to(group)?;

        for line in &lines {
            scene
                .path(segment_path(line.x1, line.y1, line.x2, line.y2))
                .stroke(self.style.stroke, self.style.stroke_width)
                .z_index(z_order::OVERLAY_HATCH)
                .add_to(lines_group)?;
        }

        debug!(
            chart = chart_id.raw(),
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            lines = lines.len(),
            "drew hatched overlay"
        );
        Ok(OverlayOutcome::Drawn {
            group,
            rect,
            line_count: lines.len(),
        })
    }
}
