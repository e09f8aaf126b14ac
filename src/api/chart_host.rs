use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::{
    ChartBackend, ChartOptions, DeferredQueue, HostConfig, LiveChart, TaskId, TemperatureDataset,
};
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::extensions::{OverlayOutcome, OverlayRenderer, OverlayTable};
use crate::interaction::{ResizeEvent, ResizePolicy};

/// Whether the hosting environment has a real display surface.
///
/// Resolved once at startup by the embedding framework; pre-rendering
/// environments report `Headless`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderingCapability {
    Display,
    Headless,
}

impl RenderingCapability {
    #[must_use]
    pub fn from_display_available(available: bool) -> Self {
        if available {
            Self::Display
        } else {
            Self::Headless
        }
    }

    #[must_use]
    pub fn is_display(self) -> bool {
        matches!(self, Self::Display)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostState {
    Uninitialized,
    /// Headless environments stop here for good.
    ConfiguringMinimal,
    ConfiguringFull,
    AwaitingConstruction,
    Constructed,
    OverlayDrawn,
    Resized,
    OverlayRedrawn,
    TornDown,
}

impl HostState {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::ConfiguringMinimal => "configuring-minimal",
            Self::ConfiguringFull => "configuring-full",
            Self::AwaitingConstruction => "awaiting-construction",
            Self::Constructed => "constructed",
            Self::OverlayDrawn => "overlay-drawn",
            Self::Resized => "resized",
            Self::OverlayRedrawn => "overlay-redrawn",
            Self::TornDown => "torn-down",
        }
    }
}

/// Lifetime counters exposed for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostStats {
    pub overlay_draws: usize,
    pub overlay_failures: usize,
    pub overlay_skips: usize,
    pub reflows: usize,
    pub reflow_failures: usize,
    pub resize_events: usize,
    pub resizes_applied: usize,
    pub tasks_skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostTask {
    BuildFullOptions,
    DrawOverlay,
    LoadReflow,
    PostInitReflow,
    ApplyResize(Viewport),
}

/// Owns chart configuration, construction and the resize/overlay lifecycle.
///
/// All work happens on the caller's thread. Timers are modelled by a
/// virtual clock that the embedding event loop drives through
/// [`ChartHost::advance`].
#[derive(Debug)]
pub struct ChartHost<C: LiveChart> {
    capability: RenderingCapability,
    config: HostConfig,
    state: HostState,
    dataset: TemperatureDataset,
    options: ChartOptions,
    chart: Option<C>,
    overlays: OverlayTable,
    overlay: OverlayRenderer,
    queue: DeferredQueue<HostTask>,
    settle_task: Option<TaskId>,
    resize_task: Option<TaskId>,
    stats: HostStats,
}

impl<C: LiveChart> ChartHost<C> {
    pub fn new(capability: RenderingCapability, config: HostConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            capability,
            config,
            state: HostState::Uninitialized,
            dataset: TemperatureDataset::world_climate(),
            options: ChartOptions::minimal(),
            chart: None,
            overlays: OverlayTable::default(),
            overlay: OverlayRenderer::new(config.overlay_region, config.hatch_style),
            queue: DeferredQueue::default(),
            settle_task: None,
            resize_task: None,
            stats: HostStats::default(),
        })
    }

    /// Replaces the dataset used for the full configuration.
    pub fn with_dataset(mut self, dataset: TemperatureDataset) -> ChartResult<Self> {
        dataset.validate()?;
        self.dataset = dataset;
        Ok(self)
    }

    #[must_use]
    pub fn capability(&self) -> RenderingCapability {
        self.capability
    }

    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> HostState {
        self.state
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    #[must_use]
    pub fn chart(&self) -> Option<&C> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut C> {
        self.chart.as_mut()
    }

    #[must_use]
    pub fn overlays(&self) -> &OverlayTable {
        &self.overlays
    }

    #[must_use]
    pub fn stats(&self) -> HostStats {
        self.stats
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Picks the configuration branch for the current environment.
    ///
    /// Headless hosts settle on the placeholder options and never touch a
    /// scene. Display hosts build the full options on the next tick.
    pub fn initialize(&mut self) {
        if self.state != HostState::Uninitialized {
            warn!(state = self.state.name(), "host already initialized");
            return;
        }

        if self.capability.is_display() {
            self.state = HostState::ConfiguringFull;
            self.queue.schedule(Duration::ZERO, HostTask::BuildFullOptions);
            debug!("display surface available, deferring full configuration");
        } else {
            self.options = ChartOptions::minimal();
            self.state = HostState::ConfiguringMinimal;
            debug!("no display surface, keeping placeholder configuration");
        }
    }

    /// Asks `backend` to build the live chart from the full options.
    pub fn construct_with<B>(&mut self, backend: &mut B) -> ChartResult<()>
    where
        B: ChartBackend<Chart = C>,
    {
        if self.state != HostState::AwaitingConstruction {
            return Err(ChartError::Lifecycle {
                operation: "construct",
                state: self.state.name(),
            });
        }
        let chart = backend.construct(&self.options)?;
        self.on_chart_constructed(chart);
        Ok(())
    }

    /// Construction-complete callback.
    pub fn on_chart_constructed(&mut self, chart: C) {
        debug!(chart = chart.id().raw(), "chart constructed");
        self.chart = Some(chart);
        self.state = HostState::Constructed;

        if self.capability.is_display() {
            self.settle_task = Some(
                self.queue
                    .schedule(self.config.settle_delay(), HostTask::DrawOverlay),
            );
            self.queue
                .schedule(self.config.load_reflow_delay(), HostTask::LoadReflow);
            self.queue
                .schedule(self.config.post_init_reflow_delay(), HostTask::PostInitReflow);
        }
    }

    /// Layout-ready signal from the surface; replaces the settle timer.
    pub fn on_layout_settled(&mut self) {
        match self.settle_task.take() {
            Some(task) if self.queue.cancel(task) => {
                trace!("layout settled before settle timer fired");
                self.draw_overlay();
            }
            _ => trace!("layout settled signal ignored, no first draw pending"),
        }
    }

    pub fn on_resize(&mut self, event: ResizeEvent) {
        if !self.capability.is_display() {
            return;
        }
        self.stats.resize_events += 1;
        if self.chart.is_none() {
            trace!("resize before construction ignored");
            return;
        }

        match self.config.resize_policy {
            ResizePolicy::Immediate => self.apply_resize(event.viewport),
            ResizePolicy::Coalesce { window_ms } => {
                if let Some(task) = self.resize_task.take() {
                    self.queue.cancel(task);
                }
                self.resize_task = Some(self.queue.schedule(
                    Duration::from_millis(window_ms),
                    HostTask::ApplyResize(event.viewport),
                ));
            }
        }
    }

    /// Advances the virtual clock, running every task that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.queue.now() + elapsed;
        while let Some(task) = self.queue.pop_due(deadline) {
            self.run_task(task);
        }
        self.queue.settle_at(deadline);
    }

    /// Drops the chart and every pending task.
    pub fn teardown(&mut self) {
        if let Some(chart) = self.chart.take() {
            self.overlays.remove(chart.id());
        }
        self.queue.clear();
        self.settle_task = None;
        self.resize_task = None;
        self.state = HostState::TornDown;
        debug!("host torn down");
    }

    fn run_task(&mut self, task: HostTask) {
        trace!(?task, now_ms = self.queue.now().as_millis() as u64, "running task");
        match task {
            HostTask::BuildFullOptions => {
                if self.state != HostState::ConfiguringFull {
                    self.stats.tasks_skipped += 1;
                    return;
                }
                self.options = ChartOptions::full(&self.dataset);
                self.state = HostState::AwaitingConstruction;
            }
            HostTask::DrawOverlay => {
                self.settle_task = None;
                self.draw_overlay();
            }
            HostTask::LoadReflow | HostTask::PostInitReflow => {
                if self.reflow() && self.overlay_present() {
                    self.draw_overlay();
                }
            }
            HostTask::ApplyResize(viewport) => {
                self.resize_task = None;
                self.apply_resize(viewport);
            }
        }
    }

    fn apply_resize(&mut self, viewport: Viewport) {
        let Some(chart) = self.chart.as_mut() else {
            self.stats.tasks_skipped += 1;
            return;
        };
        chart.set_container_size(viewport);
        self.stats.resizes_applied += 1;
        self.reflow();
        self.state = HostState::Resized;
        self.draw_overlay();
    }

    fn reflow(&mut self) -> bool {
        let Some(chart) = self.chart.as_mut() else {
            self.stats.tasks_skipped += 1;
            return false;
        };
        match chart.reflow() {
            Ok(()) => {
                self.stats.reflows += 1;
                true
            }
            Err(err) => {
                self.stats.reflow_failures += 1;
                warn!(error = %err, "chart reflow failed");
                false
            }
        }
    }

    fn overlay_present(&self) -> bool {
        self.chart
            .as_ref()
            .is_some_and(|chart| self.overlays.get(chart.id()).is_some())
    }

    fn draw_overlay(&mut self) {
        let Some(chart) = self.chart.as_mut() else {
            self.stats.tasks_skipped += 1;
            trace!("chart gone, skipping overlay draw");
            return;
        };

        match self.overlay.render(chart, &mut self.overlays) {
            OverlayOutcome::Drawn { .. } => {
                self.stats.overlay_draws += 1;
                self.state = match self.state {
                    HostState::Resized | HostState::OverlayRedrawn => HostState::OverlayRedrawn,
                    HostState::Constructed | HostState::OverlayDrawn => HostState::OverlayDrawn,
                    other => other,
                };
            }
            OverlayOutcome::Skipped => self.stats.overlay_skips += 1,
            OverlayOutcome::Failed => self.stats.overlay_failures += 1,
        }
    }
}
