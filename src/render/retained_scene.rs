use indexmap::IndexMap;
use tracing::trace;

use crate::core::{PixelRect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{Attributes, NodeId, SceneRenderer, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub shape: Shape,
    pub attributes: Attributes,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    attached: bool,
}

impl SceneNode {
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// Lifetime counters, mostly useful to assert that nothing leaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneStats {
    pub created: usize,
    pub destroyed: usize,
    pub clip_definitions: usize,
}

/// In-memory scene graph backing `SceneChart`.
///
/// Nodes live in an insertion-ordered table so that equal `z_index`
/// siblings paint in creation order.
#[derive(Debug, Clone)]
pub struct RetainedScene {
    viewport: Viewport,
    nodes: IndexMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    clip_rects: IndexMap<String, PixelRect>,
    next_id: u64,
    stats: SceneStats,
}

impl RetainedScene {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: IndexMap::new(),
            roots: Vec::new(),
            clip_rects: IndexMap::new(),
            next_id: 1,
            stats: SceneStats::default(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[must_use]
    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    #[must_use]
    pub fn clip_rects(&self) -> &IndexMap<String, PixelRect> {
        &self.clip_rects
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    #[must_use]
    pub fn subtree_len(&self, id: NodeId) -> usize {
        self.nodes.get(&id).map_or(0, |node| {
            1 + node
                .children
                .iter()
                .map(|child| self.subtree_len(*child))
                .sum::<usize>()
        })
    }

    /// Count of attached nodes with the given shape kind (`"path"`, `"rect"`, ...).
    #[must_use]
    pub fn count_kind(&self, kind: &str) -> usize {
        self.nodes
            .values()
            .filter(|node| node.attached && node.shape.kind() == kind)
            .count()
    }

    /// Children of `ids` ordered for painting: ascending `z_index`, then insertion order.
    #[must_use]
    pub fn paint_sorted(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut sorted: Vec<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect();
        sorted.sort_by_key(|id| self.nodes.get(id).map_or(0, |node| node.attributes.z_index));
        sorted
    }

    /// Visible non-group nodes in back-to-front order.
    #[must_use]
    pub fn paint_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for root in self.paint_sorted(&self.roots) {
            self.collect_leaves(root, &mut out);
        }
        out
    }

    /// Clip ids in effect for `id`, outermost first.
    #[must_use]
    pub fn clip_chain(&self, id: NodeId) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            if let Some(clip) = node.attributes.clip_path.as_deref() {
                chain.push(clip);
            }
            cursor = node.parent;
        }
        chain.reverse();
        chain
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for node in self.nodes.values() {
            node.shape.validate()?;
            node.attributes.validate()?;
            if let Some(clip) = &node.attributes.clip_path {
                if !self.clip_rects.contains_key(clip) {
                    return Err(ChartError::InvalidData(format!(
                        "clip path `{clip}` is referenced but not defined"
                    )));
                }
            }
        }
        Ok(())
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match node.shape {
            Shape::Group => {
                for child in self.paint_sorted(&node.children) {
                    self.collect_leaves(child, out);
                }
            }
            _ => out.push(id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> ChartResult<&mut SceneNode> {
        self.nodes
            .get_mut(&id)
            .ok_or(ChartError::UnknownNode(id.raw()))
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.nodes.get(&id).and_then(|node| node.parent);
        match parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(&parent) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    fn remove_subtree(&mut self, id: NodeId, released_clips: &mut Vec<String>) {
        let Some(node) = self.nodes.shift_remove(&id) else {
            return;
        };
        if let Some(clip) = node.attributes.clip_path {
            released_clips.push(clip);
        }
        self.stats.destroyed += 1;
        for child in node.children {
            self.remove_subtree(child, released_clips);
        }
    }
}

impl SceneRenderer for RetainedScene {
    fn create(&mut self, shape: Shape) -> ChartResult<NodeId> {
        shape.validate()?;
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                shape,
                attributes: Attributes::default(),
                parent: None,
                children: Vec::new(),
                attached: false,
            },
        );
        self.stats.created += 1;
        Ok(id)
    }

    fn set_attributes(&mut self, node: NodeId, attributes: Attributes) -> ChartResult<()> {
        attributes.validate()?;
        self.node_mut(node)?.attributes = attributes;
        Ok(())
    }

    fn attach(&mut self, node: NodeId, parent: Option<NodeId>) -> ChartResult<()> {
        if let Some(parent_id) = parent {
            let parent_node = self
                .nodes
                .get(&parent_id)
                .ok_or(ChartError::UnknownNode(parent_id.raw()))?;
            if !matches!(parent_node.shape, Shape::Group) {
                return Err(ChartError::InvalidData(format!(
                    "node {} is a {} and cannot hold children",
                    parent_id.raw(),
                    parent_node.shape.kind()
                )));
            }
        }
        if !self.nodes.contains_key(&node) {
            return Err(ChartError::UnknownNode(node.raw()));
        }

        if self.nodes.get(&node).is_some_and(SceneNode::is_attached) {
            self.detach(node);
        }
        match parent {
            Some(parent_id) => self.node_mut(parent_id)?.children.push(node),
            None => self.roots.push(node),
        }
        let entry = self.node_mut(node)?;
        entry.parent = parent;
        entry.attached = true;
        Ok(())
    }

    fn define_clip_rect(&mut self, id: &str, rect: PixelRect) -> ChartResult<()> {
        rect.validate()?;
        if self.clip_rects.contains_key(id) {
            return Err(ChartError::InvalidData(format!(
                "clip path `{id}` is already defined"
            )));
        }
        self.clip_rects.insert(id.to_owned(), rect);
        self.stats.clip_definitions += 1;
        Ok(())
    }

    fn destroy(&mut self, node: NodeId) -> ChartResult<()> {
        if !self.nodes.contains_key(&node) {
            return Err(ChartError::UnknownNode(node.raw()));
        }
        self.detach(node);
        let mut released_clips = Vec::new();
        self.remove_subtree(node, &mut released_clips);
        for clip in released_clips {
            let still_used = self
                .nodes
                .values()
                .any(|other| other.attributes.clip_path.as_deref() == Some(clip.as_str()));
            if !still_used {
                self.clip_rects.shift_remove(&clip);
            }
        }
        trace!(node = node.raw(), remaining = self.nodes.len(), "destroyed subtree");
        Ok(())
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }
}
