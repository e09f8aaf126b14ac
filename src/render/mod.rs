mod null_renderer;
mod primitives;
mod retained_scene;
mod scene;
mod svg_backend;
pub mod z_order;

pub use null_renderer::NullRenderer;
pub use primitives::{
    Attributes, Color, PathCommand, PathData, Shape, TextAnchor, TextShape, segment_path,
};
pub use retained_scene::{RetainedScene, SceneNode, SceneStats};
pub use scene::{ElementBuilder, NodeId, SceneRenderer};
pub use svg_backend::{SvgRenderStats, SvgRenderer, scene_to_svg};

use crate::error::ChartResult;

/// Contract implemented by any output backend.
///
/// Backends receive the fully built retained scene so drawing code stays
/// isolated from chart layout and overlay logic.
pub trait Renderer {
    fn render(&mut self, scene: &RetainedScene) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
