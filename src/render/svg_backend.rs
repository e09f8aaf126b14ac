use std::fmt::Write;

use crate::error::{ChartError, ChartResult};
use crate::render::{Attributes, NodeId, PathCommand, Renderer, RetainedScene, Shape, TextAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub groups_written: usize,
    pub shapes_written: usize,
    pub clip_paths_written: usize,
}

/// Serializes a `RetainedScene` to standalone SVG markup.
///
/// This is the display surface used for server-rendered pages: the output
/// embeds clip-path definitions and paints groups in z order.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &RetainedScene) -> ChartResult<()> {
        scene.validate()?;
        let mut writer = SvgWriter {
            scene,
            out: String::new(),
            stats: SvgRenderStats::default(),
        };
        writer.write_document().map_err(map_fmt_error)?;
        self.output = writer.out;
        self.last_stats = writer.stats;
        Ok(())
    }
}

/// One-shot helper around `SvgRenderer`.
pub fn scene_to_svg(scene: &RetainedScene) -> ChartResult<String> {
    let mut renderer = SvgRenderer::default();
    renderer.render(scene)?;
    Ok(renderer.into_output())
}

struct SvgWriter<'a> {
    scene: &'a RetainedScene,
    out: String,
    stats: SvgRenderStats,
}

impl SvgWriter<'_> {
    fn write_document(&mut self) -> std::fmt::Result {
        let scene = self.scene;
        let viewport = scene.viewport();
        write!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = viewport.width,
            h = viewport.height
        )?;

        if !scene.clip_rects().is_empty() {
            self.out.push_str("<defs>");
            for (id, rect) in scene.clip_rects() {
                write!(
                    self.out,
                    r#"<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    escape(id),
                    num(rect.x),
                    num(rect.y),
                    num(rect.width),
                    num(rect.height)
                )?;
                self.stats.clip_paths_written += 1;
            }
            self.out.push_str("</defs>");
        }

        for root in scene.paint_sorted(scene.roots()) {
            self.write_node(root)?;
        }
        self.out.push_str("</svg>");
        Ok(())
    }

    fn write_node(&mut self, id: NodeId) -> std::fmt::Result {
        let scene = self.scene;
        let Some(node) = scene.node(id) else {
            return Ok(());
        };
        let style = style_attributes(&node.attributes);
        match &node.shape {
            Shape::Group => {
                write!(self.out, "<g{style}>")?;
                self.stats.groups_written += 1;
                for child in scene.paint_sorted(&node.children) {
                    self.write_node(child)?;
                }
                self.out.push_str("</g>");
                return Ok(());
            }
            Shape::Rect(rect) => write!(
                self.out,
                r#"<rect x="{}" y="{}" width="{}" height="{}"{style}/>"#,
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height)
            )?,
            Shape::Circle { cx, cy, radius } => write!(
                self.out,
                r#"<circle cx="{}" cy="{}" r="{}"{style}/>"#,
                num(*cx),
                num(*cy),
                num(*radius)
            )?,
            Shape::Path(data) => {
                let mut d = String::new();
                for command in data {
                    if !d.is_empty() {
                        d.push(' ');
                    }
                    match command {
                        PathCommand::MoveTo(x, y) => write!(d, "M {} {}", num(*x), num(*y))?,
                        PathCommand::LineTo(x, y) => write!(d, "L {} {}", num(*x), num(*y))?,
                        PathCommand::Close => d.push('Z'),
                    }
                }
                write!(self.out, r#"<path d="{d}"{style}/>"#)?;
            }
            Shape::Text(text) => {
                let anchor = match text.anchor {
                    TextAnchor::Start => "start",
                    TextAnchor::Middle => "middle",
                    TextAnchor::End => "end",
                };
                write!(
                    self.out,
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="{anchor}"{style}>{}</text>"#,
                    num(text.x),
                    num(text.y),
                    num(text.font_size_px),
                    escape(&text.text)
                )?;
            }
        }
        self.stats.shapes_written += 1;
        Ok(())
    }
}

fn style_attributes(attributes: &Attributes) -> String {
    let mut out = String::new();
    match attributes.fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{}""#, fill.to_css());
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = attributes.stroke {
        let _ = write!(out, r#" stroke="{}""#, stroke.to_css());
    }
    if let Some(width) = attributes.stroke_width {
        let _ = write!(out, r#" stroke-width="{}""#, num(width));
    }
    if let Some(clip) = &attributes.clip_path {
        let _ = write!(out, r#" clip-path="url(#{})""#, escape(clip));
    }
    out
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    format!("{rounded}")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn map_fmt_error(err: std::fmt::Error) -> ChartError {
    ChartError::Backend(format!("failed to write svg: {err}"))
}
