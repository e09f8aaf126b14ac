use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::api::ChartOptions;
use crate::core::{AxisTransform, Viewport};
use crate::error::ChartResult;
use crate::render::SceneRenderer;

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one constructed chart instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartId(u64);

impl ChartId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocates a process-unique id.
    #[must_use]
    pub fn allocate() -> Self {
        Self(NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What the host and overlay need from a constructed chart.
pub trait LiveChart {
    type Axis: AxisTransform;
    type Scene: SceneRenderer;

    fn id(&self) -> ChartId;

    fn x_axes(&self) -> &[Self::Axis];

    fn y_axes(&self) -> &[Self::Axis];

    fn scene_mut(&mut self) -> &mut Self::Scene;

    /// Records a new container size; takes effect on the next `reflow`.
    fn set_container_size(&mut self, viewport: Viewport);

    /// Re-measures the container and rebuilds the chart's own content.
    /// Axis transforms obtained before this call are stale afterwards.
    fn reflow(&mut self) -> ChartResult<()>;
}

/// Builds live charts from options; the construction callback of the host.
pub trait ChartBackend {
    type Chart: LiveChart;

    fn construct(&mut self, options: &ChartOptions) -> ChartResult<Self::Chart>;
}
