use serde::{Deserialize, Serialize};

use crate::core::PixelRect;
use crate::error::ChartResult;
use crate::render::{Attributes, Color, PathData, Shape, TextShape};

/// Handle of one node inside a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Retained scene-graph contract used by chart and overlay drawing.
///
/// Nodes are created detached, styled, then attached to a parent group (or
/// the root). Destroying a node removes its whole subtree.
pub trait SceneRenderer {
    fn create(&mut self, shape: Shape) -> ChartResult<NodeId>;

    fn set_attributes(&mut self, node: NodeId, attributes: Attributes) -> ChartResult<()>;

    /// Attaches `node` under `parent`, or at the root when `parent` is `None`.
    fn attach(&mut self, node: NodeId, parent: Option<NodeId>) -> ChartResult<()>;

    /// Registers a raw clip-path definition that nodes reference by id.
    fn define_clip_rect(&mut self, id: &str, rect: PixelRect) -> ChartResult<()>;

    fn destroy(&mut self, node: NodeId) -> ChartResult<()>;

    fn contains(&self, node: NodeId) -> bool;

    fn g(&mut self) -> ElementBuilder<'_, Self>
    where
        Self: Sized,
    {
        ElementBuilder::new(self, Shape::Group)
    }

    fn rect(&mut self, rect: PixelRect) -> ElementBuilder<'_, Self>
    where
        Self: Sized,
    {
        ElementBuilder::new(self, Shape::Rect(rect))
    }

    fn path(&mut self, data: PathData) -> ElementBuilder<'_, Self>
    where
        Self: Sized,
    {
        ElementBuilder::new(self, Shape::Path(data))
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> ElementBuilder<'_, Self>
    where
        Self: Sized,
    {
        ElementBuilder::new(self, Shape::Circle { cx, cy, radius })
    }

    fn text(&mut self, text: TextShape) -> ElementBuilder<'_, Self>
    where
        Self: Sized,
    {
        ElementBuilder::new(self, Shape::Text(text))
    }
}

/// Fluent attribute-and-attach builder returned by the `SceneRenderer` shortcuts.
#[must_use = "elements are only created by `add` or `add_to`"]
pub struct ElementBuilder<'a, S: SceneRenderer> {
    scene: &'a mut S,
    shape: Shape,
    attributes: Attributes,
}

impl<'a, S: SceneRenderer> ElementBuilder<'a, S> {
    fn new(scene: &'a mut S, shape: Shape) -> Self {
        Self {
            scene,
            shape,
            attributes: Attributes::default(),
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.attributes.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color, width: f64) -> Self {
        self.attributes.stroke = Some(color);
        self.attributes.stroke_width = Some(width);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.attributes.z_index = z_index;
        self
    }

    pub fn clip_path(mut self, id: impl Into<String>) -> Self {
        self.attributes.clip_path = Some(id.into());
        self
    }

    /// Creates the element at the scene root.
    pub fn add(self) -> ChartResult<NodeId> {
        self.attach_to(None)
    }

    pub fn add_to(self, parent: NodeId) -> ChartResult<NodeId> {
        self.attach_to(Some(parent))
    }

    fn attach_to(self, parent: Option<NodeId>) -> ChartResult<NodeId> {
        let node = self.scene.create(self.shape)?;
        let attached = self
            .scene
            .set_attributes(node, self.attributes)
            .and_then(|()| self.scene.attach(node, parent));
        if let Err(err) = attached {
            let _ = self.scene.destroy(node);
            return Err(err);
        }
        Ok(node)
    }
}
