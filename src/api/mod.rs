mod chart_host;
mod dataset;
mod host_config;
mod live_chart;
mod options;
pub mod page;
mod scene_chart;
mod scheduler;

pub use chart_host::{ChartHost, HostState, HostStats, RenderingCapability};
pub use dataset::{CitySeries, MONTHS, TemperatureDataset};
pub use host_config::HostConfig;
pub use live_chart::{ChartBackend, ChartId, LiveChart};
pub use options::{
    ChartOptions, ChartSection, CreditsOptions, HorizontalAlign, LegendLayout, LegendOptions,
    LegendOverride, MarkerOptions, MarkerSymbol, ResponsiveCondition, ResponsiveOverrides,
    ResponsiveRule, SeriesDefaults, SeriesKind, SeriesOptions, TitleOptions, VerticalAlign,
    XAxisOptions, YAxisOptions,
};
pub use page::{APP_TITLE, render_page};
pub use scene_chart::{SceneChart, SceneChartBackend};
pub use scheduler::{DeferredQueue, TaskId};
