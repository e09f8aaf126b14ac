use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::TAU;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Attributes, Color, NodeId, PathCommand, Renderer, RetainedScene, Shape, TextAnchor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub shapes_drawn: usize,
    pub clips_applied: usize,
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Paints a retained scene onto an offscreen image surface, honoring
/// group clip paths and z order.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Encodes the current surface as PNG.
    pub fn write_png(&self, out: &mut impl std::io::Write) -> ChartResult<()> {
        self.surface
            .write_to_png(out)
            .map_err(|err| ChartError::Backend(format!("failed to encode png: {err}")))
    }

    fn draw_node(
        &self,
        context: &Context,
        scene: &RetainedScene,
        id: NodeId,
        stats: &mut CairoRenderStats,
    ) -> ChartResult<()> {
        let Some(node) = scene.node(id) else {
            return Ok(());
        };

        context
            .save()
            .map_err(|err| map_backend_error("failed to save context", err))?;
        if let Some(clip_id) = node.attributes.clip_path.as_deref() {
            if let Some(rect) = scene.clip_rects().get(clip_id) {
                context.rectangle(rect.x, rect.y, rect.width, rect.height);
                context.clip();
                stats.clips_applied += 1;
            }
        }

        match &node.shape {
            Shape::Group => {
                for child in scene.paint_sorted(&node.children) {
                    self.draw_node(context, scene, child, stats)?;
                }
            }
            Shape::Rect(rect) => {
                context.rectangle(rect.x, rect.y, rect.width, rect.height);
                paint(context, &node.attributes)?;
                stats.shapes_drawn += 1;
            }
            Shape::Circle { cx, cy, radius } => {
                context.new_sub_path();
                context.arc(*cx, *cy, *radius, 0.0, TAU);
                paint(context, &node.attributes)?;
                stats.shapes_drawn += 1;
            }
            Shape::Path(data) => {
                context.new_path();
                for command in data {
                    match command {
                        PathCommand::MoveTo(x, y) => context.move_to(*x, *y),
                        PathCommand::LineTo(x, y) => context.line_to(*x, *y),
                        PathCommand::Close => context.close_path(),
                    }
                }
                paint(context, &node.attributes)?;
                stats.shapes_drawn += 1;
            }
            Shape::Text(text) => {
                let layout = pangocairo::functions::create_layout(context);
                let font_description =
                    FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
                layout.set_font_description(Some(&font_description));
                layout.set_text(&text.text);

                let (text_width, text_height) = layout.pixel_size();
                let x = match text.anchor {
                    TextAnchor::Start => text.x,
                    TextAnchor::Middle => text.x - f64::from(text_width) / 2.0,
                    TextAnchor::End => text.x - f64::from(text_width),
                };
                // Scene text is baseline-anchored; pango lays out from the top.
                let y = text.y - f64::from(text_height) * 0.8;

                apply_color(context, node.attributes.fill.unwrap_or(Color::rgb(0.0, 0.0, 0.0)));
                context.move_to(x, y);
                pangocairo::functions::show_layout(context, &layout);
                stats.shapes_drawn += 1;
            }
        }

        context
            .restore()
            .map_err(|err| map_backend_error("failed to restore context", err))
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, scene: &RetainedScene) -> ChartResult<()> {
        scene.validate()?;
        self.clear_color.validate()?;

        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        apply_color(&context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        for root in scene.paint_sorted(scene.roots()) {
            self.draw_node(&context, scene, root, &mut stats)?;
        }
        self.last_stats = stats;
        Ok(())
    }
}

fn paint(context: &Context, attributes: &Attributes) -> ChartResult<()> {
    if let Some(fill) = attributes.fill {
        apply_color(context, fill);
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill shape", err))?;
    }
    if let Some(stroke) = attributes.stroke {
        apply_color(context, stroke);
        context.set_line_width(attributes.stroke_width.unwrap_or(1.0));
        context
            .stroke_preserve()
            .map_err(|err| map_backend_error("failed to stroke shape", err))?;
    }
    context.new_path();
    Ok(())
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
