use crate::error::ChartResult;
use crate::render::{Renderer, RetainedScene};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates the scene so tests can catch invalid geometry or
/// dangling clip references without a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_shape_count: usize,
    pub last_clip_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, scene: &RetainedScene) -> ChartResult<()> {
        scene.validate()?;
        self.last_shape_count = scene.paint_order().len();
        self.last_clip_count = scene.clip_rects().len();
        self.frames_rendered += 1;
        Ok(())
    }
}
