#![allow(dead_code)]

use climate_chart::api::{ChartBackend, ChartId, ChartOptions, LiveChart};
use climate_chart::core::{AxisTransform, PixelRect, Viewport};
use climate_chart::error::{ChartError, ChartResult};
use climate_chart::render::{Attributes, NodeId, RetainedScene, SceneRenderer, Shape};

/// `offset + scale * value`, optionally refusing every conversion.
#[derive(Debug, Clone, Copy)]
pub struct AffineAxis {
    pub offset: f64,
    pub scale: f64,
    pub fail: bool,
}

impl AffineAxis {
    pub fn new(offset: f64, scale: f64) -> Self {
        Self {
            offset,
            scale,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
            fail: true,
        }
    }
}

impl AxisTransform for AffineAxis {
    fn to_pixels(&self, value: f64) -> ChartResult<f64> {
        if self.fail {
            return Err(ChartError::AxisNotLaidOut { axis: "test" });
        }
        Ok(self.offset + self.scale * value)
    }
}

/// Scene wrapper that can refuse clip-path definitions and counts calls.
#[derive(Debug)]
pub struct ProbeScene {
    pub inner: RetainedScene,
    pub refuse_clip_paths: bool,
    pub calls: usize,
}

impl ProbeScene {
    pub fn new() -> Self {
        Self {
            inner: RetainedScene::new(Viewport::new(400, 300)),
            refuse_clip_paths: false,
            calls: 0,
        }
    }
}

impl SceneRenderer for ProbeScene {
    fn create(&mut self, shape: Shape) -> ChartResult<NodeId> {
        self.calls += 1;
        self.inner.create(shape)
    }

    fn set_attributes(&mut self, node: NodeId, attributes: Attributes) -> ChartResult<()> {
        self.calls += 1;
        self.inner.set_attributes(node, attributes)
    }

    fn attach(&mut self, node: NodeId, parent: Option<NodeId>) -> ChartResult<()> {
        self.calls += 1;
        self.inner.attach(node, parent)
    }

    fn define_clip_rect(&mut self, id: &str, rect: PixelRect) -> ChartResult<()> {
        self.calls += 1;
        if self.refuse_clip_paths {
            return Err(ChartError::Backend("clip paths unsupported".to_owned()));
        }
        self.inner.define_clip_rect(id, rect)
    }

    fn destroy(&mut self, node: NodeId) -> ChartResult<()> {
        self.calls += 1;
        self.inner.destroy(node)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.inner.contains(node)
    }
}

#[derive(Debug)]
pub struct FakeChart {
    pub id: ChartId,
    pub x_axes: Vec<AffineAxis>,
    pub y_axes: Vec<AffineAxis>,
    pub scene: ProbeScene,
    pub container: Viewport,
    pub reflows: usize,
}

impl FakeChart {
    /// `f_x(v) = 10v`, `f_y(v) = 200 - 5v`.
    pub fn worked_example() -> Self {
        Self::with_axes(
            vec![AffineAxis::new(0.0, 10.0)],
            vec![AffineAxis::new(200.0, -5.0)],
        )
    }

    pub fn with_axes(x_axes: Vec<AffineAxis>, y_axes: Vec<AffineAxis>) -> Self {
        Self {
            id: ChartId::allocate(),
            x_axes,
            y_axes,
            scene: ProbeScene::new(),
            container: Viewport::new(400, 300),
            reflows: 0,
        }
    }

    pub fn scene(&self) -> &RetainedScene {
        &self.scene.inner
    }
}

impl LiveChart for FakeChart {
    type Axis = AffineAxis;
    type Scene = ProbeScene;

    fn id(&self) -> ChartId {
        self.id
    }

    fn x_axes(&self) -> &[AffineAxis] {
        &self.x_axes
    }

    fn y_axes(&self) -> &[AffineAxis] {
        &self.y_axes
    }

    fn scene_mut(&mut self) -> &mut ProbeScene {
        &mut self.scene
    }

    fn set_container_size(&mut self, viewport: Viewport) {
        self.container = viewport;
    }

    fn reflow(&mut self) -> ChartResult<()> {
        self.reflows += 1;
        Ok(())
    }
}

/// Backend counting how often the host asked for a chart.
#[derive(Debug, Default)]
pub struct CountingBackend {
    pub constructs: usize,
}

impl ChartBackend for CountingBackend {
    type Chart = FakeChart;

    fn construct(&mut self, _options: &ChartOptions) -> ChartResult<FakeChart> {
        self.constructs += 1;
        Ok(FakeChart::worked_example())
    }
}

/// Root groups carrying a clip path inside the overlay, i.e. live overlays.
pub fn clipped_group_count(scene: &RetainedScene) -> usize {
    scene
        .paint_order()
        .iter()
        .filter_map(|id| scene.node(*id)?.parent)
        .filter(|parent| {
            scene
                .node(*parent)
                .is_some_and(|node| node.attributes.clip_path.is_some())
        })
        .collect::<std::collections::BTreeSet<_>>()
        .len()
}
