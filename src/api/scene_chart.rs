use tracing::{debug, trace};

use crate::api::{
    ChartBackend, ChartId, ChartOptions, HorizontalAlign, LegendLayout, LiveChart, VerticalAlign,
};
use crate::core::{Axis, AxisTransform, PixelRect, PlotLayout, Reservations, Viewport};
use crate::error::ChartResult;
use crate::render::{
    Color, NodeId, RetainedScene, SceneRenderer, Shape, TextAnchor, TextShape, segment_path,
    z_order,
};

const TEXT_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);
const LABEL_COLOR: Color = Color::rgb(0.4, 0.4, 0.4);
const GRID_COLOR: Color = Color::rgb(0.902, 0.902, 0.902);
const AXIS_COLOR: Color = Color::rgb(0.8, 0.839, 0.922);
const FALLBACK_SERIES_COLORS: [Color; 3] = [
    Color::rgb(0.173, 0.686, 0.996),
    Color::rgb(0.329, 0.31, 0.776),
    Color::rgb(0.0, 0.886, 0.447),
];
const TICK_LENGTH: f64 = 10.0;
const CHAR_WIDTH_RATIO: f64 = 0.55;
const LINE_HEIGHT_RATIO: f64 = 1.6;
const LEGEND_SWATCH_WIDTH: f64 = 16.0;
const LEGEND_ITEM_GAP: f64 = 20.0;

/// Live chart drawn into a [`RetainedScene`].
///
/// The chart owns a handful of root-level content groups (grid, axes,
/// series, labels). `reflow` destroys and rebuilds only those groups, so
/// anything else attached to the scene survives a resize.
#[derive(Debug)]
pub struct SceneChart {
    id: ChartId,
    options: ChartOptions,
    container: Viewport,
    scene: RetainedScene,
    x_axes: Vec<Axis>,
    y_axes: Vec<Axis>,
    content: Vec<NodeId>,
    layout: Option<PlotLayout>,
    reflow_count: usize,
}

impl SceneChart {
    pub fn new(options: ChartOptions, container: Viewport) -> ChartResult<Self> {
        options.validate()?;

        let mut x_axes = Vec::new();
        if let Some(x_axis) = &options.x_axis {
            x_axes.push(Axis::category(x_axis.categories.clone())?);
        }
        let mut y_axes = Vec::new();
        if options.y_axis.is_some() {
            y_axes.push(Axis::value_from_samples(
                options.series.iter().flat_map(|series| series.data.iter()),
            )?);
        }

        let mut chart = Self {
            id: ChartId::allocate(),
            options,
            container,
            scene: RetainedScene::new(container),
            x_axes,
            y_axes,
            content: Vec::new(),
            layout: None,
            reflow_count: 0,
        };
        chart.rebuild()?;
        debug!(
            chart = chart.id.raw(),
            width = container.width,
            height = container.height,
            "constructed chart"
        );
        Ok(chart)
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    #[must_use]
    pub fn container(&self) -> Viewport {
        self.container
    }

    #[must_use]
    pub fn layout(&self) -> Option<PlotLayout> {
        self.layout
    }

    #[must_use]
    pub fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    #[must_use]
    pub fn content_groups(&self) -> &[NodeId] {
        &self.content
    }

    /// Number of completed reflows, not counting the initial build.
    #[must_use]
    pub fn reflow_count(&self) -> usize {
        self.reflow_count
    }

    fn rebuild(&mut self) -> ChartResult<()> {
        for group in std::mem::take(&mut self.content) {
            if self.scene.contains(group) {
                self.scene.destroy(group)?;
            }
        }
        self.layout = None;
        for axis in self.x_axes.iter_mut().chain(self.y_axes.iter_mut()) {
            axis.invalidate_layout();
        }
        self.scene.set_viewport(self.container);

        let options = self.options.resolved_for_width(self.container.width);
        let frame = ChartFrame::plan(&options, self.container, self.y_axes.first());
        let layout = PlotLayout::compute(self.container, frame.spacing, frame.reservations)?;
        let plot = layout.plot;
        for axis in &mut self.x_axes {
            axis.lay_out(plot.x, plot.right())?;
        }
        for axis in &mut self.y_axes {
            axis.lay_out(plot.bottom(), plot.y)?;
        }
        self.layout = Some(layout);

        if let Some(background) = frame.background {
            let group = self.scene.g().z_index(z_order::GRID - 1).add()?;
            self.content.push(group);
            let full = PixelRect::new(
                0.0,
                0.0,
                f64::from(self.container.width),
                f64::from(self.container.height),
            );
            self.scene.rect(full).fill(background).add_to(group)?;
        }

        let grid = self.draw_grid(&options, plot)?;
        self.content.push(grid);
        let axes = self.draw_axes(&options, plot)?;
        self.content.push(axes);
        let series = self.draw_series(&options)?;
        self.content.push(series);
        let labels = self.draw_labels(&options, &frame, plot)?;
        self.content.push(labels);

        trace!(
            chart = self.id.raw(),
            nodes = self.scene.len(),
            plot_x = plot.x,
            plot_y = plot.y,
            plot_width = plot.width,
            plot_height = plot.height,
            "laid out chart"
        );
        Ok(())
    }

    fn draw_grid(&mut self, options: &ChartOptions, plot: PixelRect) -> ChartResult<NodeId> {
        let group = self.scene.g().z_index(z_order::GRID).add()?;
        let (Some(y_axis), Some(y_options)) = (self.y_axes.first(), options.y_axis.as_ref()) else {
            return Ok(group);
        };
        if y_options.grid_line_width <= 0.0 {
            return Ok(group);
        }
        for tick in y_axis.ticks() {
            let y = y_axis.to_pixels(tick)?;
            self.scene
                .path(segment_path(plot.x, y, plot.right(), y))
                .stroke(GRID_COLOR, y_options.grid_line_width)
                .add_to(group)?;
        }
        Ok(group)
    }

    fn draw_axes(&mut self, options: &ChartOptions, plot: PixelRect) -> ChartResult<NodeId> {
        let group = self.scene.g().z_index(z_order::AXIS).add()?;
        let (Some(x_axis), Some(x_options)) = (self.x_axes.first(), options.x_axis.as_ref()) else {
            return Ok(group);
        };
        if x_options.line_width > 0.0 {
            self.scene
                .path(segment_path(plot.x, plot.bottom(), plot.right(), plot.bottom()))
                .stroke(AXIS_COLOR, x_options.line_width)
                .add_to(group)?;
        }
        if x_options.tick_width > 0.0 {
            for index in 0..=x_axis.categories().len() {
                let x = x_axis.to_pixels(index as f64 - 0.5)?;
                self.scene
                    .path(segment_path(x, plot.bottom(), x, plot.bottom() + TICK_LENGTH))
                    .stroke(AXIS_COLOR, x_options.tick_width)
                    .add_to(group)?;
            }
        }
        Ok(group)
    }

    fn draw_series(&mut self, options: &ChartOptions) -> ChartResult<NodeId> {
        let defaults = options.plot_options.unwrap_or_default();
        let group = self.scene.g().z_index(defaults.z_index).add()?;
        let (Some(x_axis), Some(y_axis)) = (self.x_axes.first(), self.y_axes.first()) else {
            return Ok(group);
        };

        for (index, series) in options.series.iter().enumerate() {
            let color = series_color(series.color.as_deref(), index)?;
            let mut points = Vec::with_capacity(series.data.len());
            for (category, value) in series.data.iter().enumerate() {
                points.push((x_axis.to_pixels(category as f64)?, y_axis.to_pixels(*value)?));
            }
            if points.len() >= 2 {
                let Shape::Path(data) = Shape::polyline(&points) else {
                    continue;
                };
                self.scene
                    .path(data)
                    .stroke(color, defaults.line_width)
                    .add_to(group)?;
            }
            if defaults.marker.radius > 0.0 {
                for (x, y) in points {
                    self.scene
                        .circle(x, y, defaults.marker.radius)
                        .fill(color)
                        .z_index(1)
                        .add_to(group)?;
                }
            }
        }
        Ok(group)
    }

    fn draw_labels(
        &mut self,
        options: &ChartOptions,
        frame: &ChartFrame,
        plot: PixelRect,
    ) -> ChartResult<NodeId> {
        let group = self.scene.g().z_index(z_order::LABELS).add()?;
        let center_x = f64::from(self.container.width) / 2.0;

        if let Some(baseline) = frame.title_baseline {
            self.scene
                .text(TextShape::new(
                    options.title.text.clone(),
                    center_x,
                    baseline,
                    options.title.font_size_px,
                ))
                .fill(TEXT_COLOR)
                .add_to(group)?;
        }
        if let (Some(baseline), Some(subtitle)) = (frame.subtitle_baseline, &options.subtitle) {
            self.scene
                .text(TextShape::new(
                    subtitle.text.clone(),
                    center_x,
                    baseline,
                    subtitle.font_size_px,
                ))
                .fill(LABEL_COLOR)
                .add_to(group)?;
        }

        if let (Some(x_axis), Some(x_options)) = (self.x_axes.first(), options.x_axis.as_ref()) {
            let baseline = plot.bottom() + TICK_LENGTH + x_options.label_font_size_px;
            for (index, category) in x_axis.categories().iter().enumerate() {
                let x = x_axis.to_pixels(index as f64)?;
                self.scene
                    .text(TextShape::new(
                        category.clone(),
                        x,
                        baseline,
                        x_options.label_font_size_px,
                    ))
                    .fill(LABEL_COLOR)
                    .add_to(group)?;
            }
        }

        if let (Some(y_axis), Some(y_options)) = (self.y_axes.first(), options.y_axis.as_ref()) {
            let font = y_options.label_font_size_px;
            for tick in y_axis.ticks() {
                let y = y_axis.to_pixels(tick)?;
                self.scene
                    .text(
                        TextShape::new(format_tick(tick), plot.x - 8.0, y + font * 0.35, font)
                            .anchored(TextAnchor::End),
                    )
                    .fill(LABEL_COLOR)
                    .add_to(group)?;
            }
            self.scene
                .text(
                    TextShape::new(
                        y_options.title.text.clone(),
                        plot.x,
                        plot.y - y_options.title.font_size_px * 0.6,
                        y_options.title.font_size_px,
                    )
                    .anchored(TextAnchor::Start),
                )
                .fill(LABEL_COLOR)
                .add_to(group)?;
        }

        if let Some(legend) = &frame.legend {
            for item in &legend.items {
                self.scene
                    .path(segment_path(
                        item.x,
                        item.y_center,
                        item.x + LEGEND_SWATCH_WIDTH,
                        item.y_center,
                    ))
                    .stroke(item.color, 2.0)
                    .add_to(group)?;
                self.scene
                    .text(
                        TextShape::new(
                            item.label.clone(),
                            item.x + LEGEND_SWATCH_WIDTH + 6.0,
                            item.y_center + legend.font_size_px * 0.35,
                            legend.font_size_px,
                        )
                        .anchored(TextAnchor::Start),
                    )
                    .fill(TEXT_COLOR)
                    .add_to(group)?;
            }
        }

        if let Some(credits) = options.credits.as_ref().filter(|credits| credits.enabled) {
            self.scene
                .text(
                    TextShape::new(
                        credits.text.clone(),
                        f64::from(self.container.width) - 10.0,
                        f64::from(self.container.height) - 5.0,
                        credits.font_size_px,
                    )
                    .anchored(TextAnchor::End),
                )
                .fill(LABEL_COLOR)
                .add_to(group)?;
        }

        Ok(group)
    }
}

impl LiveChart for SceneChart {
    type Axis = Axis;
    type Scene = RetainedScene;

    fn id(&self) -> ChartId {
        self.id
    }

    fn x_axes(&self) -> &[Axis] {
        &self.x_axes
    }

    fn y_axes(&self) -> &[Axis] {
        &self.y_axes
    }

    fn scene_mut(&mut self) -> &mut RetainedScene {
        &mut self.scene
    }

    fn set_container_size(&mut self, viewport: Viewport) {
        self.container = viewport;
    }

    fn reflow(&mut self) -> ChartResult<()> {
        self.rebuild()?;
        self.reflow_count += 1;
        debug!(
            chart = self.id.raw(),
            width = self.container.width,
            height = self.container.height,
            reflows = self.reflow_count,
            "reflowed chart"
        );
        Ok(())
    }
}

/// Backend constructing [`SceneChart`]s for a fixed container size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneChartBackend {
    container: Viewport,
}

impl SceneChartBackend {
    #[must_use]
    pub fn new(container: Viewport) -> Self {
        Self { container }
    }
}

impl ChartBackend for SceneChartBackend {
    type Chart = SceneChart;

    fn construct(&mut self, options: &ChartOptions) -> ChartResult<SceneChart> {
        SceneChart::new(options.clone(), self.container)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LegendItem {
    label: String,
    color: Color,
    x: f64,
    y_center: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct LegendPlan {
    font_size_px: f64,
    items: Vec<LegendItem>,
}

/// Container-relative positions resolved before the plot area is known.
#[derive(Debug, Clone, PartialEq)]
struct ChartFrame {
    spacing: crate::core::Spacing,
    reservations: Reservations,
    background: Option<Color>,
    title_baseline: Option<f64>,
    subtitle_baseline: Option<f64>,
    legend: Option<LegendPlan>,
}

impl ChartFrame {
    fn plan(options: &ChartOptions, container: Viewport, y_axis: Option<&Axis>) -> Self {
        let spacing = options.chart.spacing.unwrap_or_default();
        let width = f64::from(container.width);
        let height = f64::from(container.height);
        let mut reservations = Reservations::default();

        let mut cursor = spacing.top;
        let title_baseline = if options.title.text.is_empty() {
            None
        } else {
            let font = options.title.font_size_px;
            cursor += font * LINE_HEIGHT_RATIO;
            Some(cursor - font * 0.4)
        };
        let subtitle_baseline = options.subtitle.as_ref().map(|subtitle| {
            cursor += subtitle.font_size_px * LINE_HEIGHT_RATIO;
            cursor - subtitle.font_size_px * 0.4
        });

        let background = options
            .chart
            .background_color
            .as_deref()
            .filter(|color| *color != "transparent")
            .and_then(|color| Color::from_hex(color).ok());

        let legend_entries: Vec<(String, Color, f64)> = match &options.legend {
            Some(legend) => options
                .series
                .iter()
                .enumerate()
                .filter_map(|(index, series)| {
                    let name = series.name.clone()?;
                    let color = series_color(series.color.as_deref(), index).ok()?;
                    let item_width = LEGEND_SWATCH_WIDTH
                        + 6.0
                        + text_width(&name, legend.font_size_px);
                    Some((name, color, item_width))
                })
                .collect(),
            None => Vec::new(),
        };

        let mut legend_plan = None;
        if let (Some(legend), false) = (options.legend, legend_entries.is_empty()) {
            let row_height = legend.font_size_px * LINE_HEIGHT_RATIO;
            let (rows, band_width) = match legend.layout {
                LegendLayout::Horizontal => (
                    1,
                    legend_entries.iter().map(|entry| entry.2).sum::<f64>()
                        + LEGEND_ITEM_GAP * (legend_entries.len() - 1) as f64,
                ),
                LegendLayout::Vertical => (
                    legend_entries.len(),
                    legend_entries
                        .iter()
                        .map(|entry| entry.2)
                        .fold(0.0, f64::max),
                ),
            };
            let band_height = rows as f64 * row_height;

            let band_left = match legend.align {
                HorizontalAlign::Left => spacing.left,
                HorizontalAlign::Center => (width - band_width) / 2.0,
                HorizontalAlign::Right => width - spacing.right - band_width,
            };
            let band_top = match legend.vertical_align {
                VerticalAlign::Top => {
                    let top = cursor;
                    cursor += band_height;
                    top
                }
                VerticalAlign::Middle => {
                    let gutter = band_width + LEGEND_ITEM_GAP;
                    match legend.align {
                        HorizontalAlign::Left => reservations.left_gutter += gutter,
                        HorizontalAlign::Center | HorizontalAlign::Right => {
                            reservations.right_gutter += gutter;
                        }
                    }
                    (height - band_height) / 2.0
                }
                VerticalAlign::Bottom => {
                    reservations.footer += band_height + 8.0;
                    height - spacing.bottom - band_height
                }
            };

            let mut items = Vec::with_capacity(legend_entries.len());
            let mut x = band_left;
            for (index, (label, color, item_width)) in legend_entries.into_iter().enumerate() {
                let (item_x, row) = match legend.layout {
                    LegendLayout::Horizontal => {
                        let item_x = x;
                        x += item_width + LEGEND_ITEM_GAP;
                        (item_x, 0)
                    }
                    LegendLayout::Vertical => (band_left, index),
                };
                items.push(LegendItem {
                    label,
                    color,
                    x: item_x,
                    y_center: band_top + (row as f64 + 0.5) * row_height,
                });
            }
            legend_plan = Some(LegendPlan {
                font_size_px: legend.font_size_px,
                items,
            });
        }

        if let Some(y_options) = &options.y_axis {
            cursor += y_options.title.font_size_px * LINE_HEIGHT_RATIO;
            let widest = y_axis
                .and_then(|axis| match axis.kind() {
                    crate::core::AxisKind::Value { data_min, data_max } => Some(
                        format_tick(*data_min)
                            .len()
                            .max(format_tick(*data_max).len())
                            + 1,
                    ),
                    crate::core::AxisKind::Category { .. } => None,
                })
                .unwrap_or(3);
            reservations.left_gutter +=
                widest as f64 * y_options.label_font_size_px * CHAR_WIDTH_RATIO + 10.0;
        }
        if let Some(x_options) = &options.x_axis {
            reservations.footer += TICK_LENGTH + x_options.label_font_size_px * LINE_HEIGHT_RATIO;
        }
        reservations.header = cursor - spacing.top;

        Self {
            spacing,
            reservations,
            background,
            title_baseline,
            subtitle_baseline,
            legend: legend_plan,
        }
    }
}

fn series_color(color: Option<&str>, index: usize) -> ChartResult<Color> {
    match color {
        Some(hex) => Color::from_hex(hex),
        None => Ok(FALLBACK_SERIES_COLORS[index % FALLBACK_SERIES_COLORS.len()]),
    }
}

fn text_width(text: &str, font_size_px: f64) -> f64 {
    text.chars().count() as f64 * font_size_px * CHAR_WIDTH_RATIO
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::{SceneChart, format_tick};
    use crate::api::{ChartOptions, LiveChart, TemperatureDataset};
    use crate::core::{AxisTransform, Viewport};
    use crate::render::{Renderer, SvgRenderer};

    fn full_chart(width: u32, height: u32) -> SceneChart {
        SceneChart::new(
            ChartOptions::full(&TemperatureDataset::world_climate()),
            Viewport::new(width, height),
        )
        .expect("chart")
    }

    #[test]
    fn full_chart_lays_out_both_axes() {
        let chart = full_chart(800, 500);
        assert_eq!(chart.x_axes().len(), 1);
        assert_eq!(chart.y_axes().len(), 1);
        let plot = chart.layout().expect("layout").plot;
        let left = chart.x_axes()[0].to_pixels(-0.5).expect("x");
        assert!((left - plot.x).abs() < 1e-9);
        let (min, max) = chart.y_axes()[0].domain().expect("domain");
        assert!(min <= -0.2 && max >= 26.5);
    }

    #[test]
    fn series_draw_polylines_and_markers() {
        let chart = full_chart(800, 500);
        // two polylines, twelve markers each
        assert_eq!(chart.scene().count_kind("circle"), 24);
        let svg = {
            let mut renderer = SvgRenderer::default();
            renderer.render(chart.scene()).expect("svg");
            renderer.into_output()
        };
        assert!(svg.contains("Monthly Average Temperature"));
        assert!(svg.contains("Source: WorldClimate.com"));
        assert!(svg.contains("Tokyo"));
        assert!(svg.contains("New York"));
    }

    #[test]
    fn reflow_rebuilds_content_without_growing_scene() {
        let mut chart = full_chart(800, 500);
        let before = chart.scene().len();
        chart.set_container_size(Viewport::new(640, 420));
        chart.reflow().expect("reflow");
        assert_eq!(chart.reflow_count(), 1);
        assert_eq!(chart.scene().len(), before);
        assert_eq!(chart.layout().expect("layout").viewport, Viewport::new(640, 420));
    }

    #[test]
    fn reflow_into_tiny_container_fails_and_drops_transforms() {
        let mut chart = full_chart(800, 500);
        chart.set_container_size(Viewport::new(40, 40));
        assert!(chart.reflow().is_err());
        assert!(chart.x_axes()[0].to_pixels(1.0).is_err());
    }

    #[test]
    fn tick_labels_drop_trailing_zeros() {
        assert_eq!(format_tick(25.0), "25");
        assert_eq!(format_tick(-5.0), "-5");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
