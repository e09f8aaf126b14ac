use serde::{Deserialize, Serialize};

use crate::api::TemperatureDataset;
use crate::core::Spacing;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Declarative chart description handed to the chart backend.
///
/// Serialized in camelCase so the same JSON can be embedded in a
/// server-rendered page and picked up again at hydration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub chart: ChartSection,
    pub title: TitleOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<TitleOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<XAxisOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<YAxisOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_options: Option<SeriesDefaults>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responsive: Vec<ResponsiveRule>,
    pub series: Vec<SeriesOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<CreditsOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesKind {
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSection {
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(default)]
    pub reflow: bool,
    #[serde(default)]
    pub animation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleOptions {
    pub text: String,
    #[serde(default = "default_title_font_px")]
    pub font_size_px: f64,
}

impl TitleOptions {
    #[must_use]
    pub fn new(text: impl Into<String>, font_size_px: f64) -> Self {
        Self {
            text: text.into(),
            font_size_px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxisOptions {
    pub categories: Vec<String>,
    pub label_font_size_px: f64,
    pub tick_width: f64,
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxisOptions {
    pub title: TitleOptions,
    pub label_font_size_px: f64,
    pub grid_line_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendLayout {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOptions {
    pub layout: LegendLayout,
    pub align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub font_size_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerSymbol {
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerOptions {
    pub radius: f64,
    pub symbol: MarkerSymbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDefaults {
    pub line_width: f64,
    pub marker: MarkerOptions,
    pub animation_duration_ms: u64,
    /// Keeps series above plot bands and overlays.
    pub z_index: i32,
}

impl Default for SeriesDefaults {
    fn default() -> Self {
        Self {
            line_width: 3.0,
            marker: MarkerOptions {
                radius: 5.0,
                symbol: MarkerSymbol::Circle,
            },
            animation_duration_ms: 1000,
            z_index: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsOptions {
    pub enabled: bool,
    pub text: String,
    pub font_size_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveCondition {
    pub max_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LegendLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<HorizontalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendOverride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveRule {
    pub condition: ResponsiveCondition,
    pub chart_options: ResponsiveOverrides,
}

impl ResponsiveRule {
    #[must_use]
    pub fn matches(&self, container_width: u32) -> bool {
        container_width <= self.condition.max_width
    }
}

fn default_title_font_px() -> f64 {
    18.0
}

impl ChartOptions {
    /// Placeholder used where no display surface exists.
    ///
    /// It carries just enough structure for pre-rendering: a title and one
    /// empty line series, no axes, no legend.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            chart: ChartSection {
                kind: SeriesKind::Line,
                spacing: None,
                reflow: false,
                animation: false,
                background_color: None,
            },
            title: TitleOptions::new("Loading chart...", default_title_font_px()),
            subtitle: None,
            x_axis: None,
            y_axis: None,
            legend: None,
            plot_options: None,
            responsive: Vec::new(),
            series: vec![SeriesOptions {
                name: None,
                kind: SeriesKind::Line,
                color: None,
                data: Vec::new(),
            }],
            credits: None,
        }
    }

    /// Complete interactive configuration for `dataset`.
    #[must_use]
    pub fn full(dataset: &TemperatureDataset) -> Self {
        let bottom_center_legend = LegendOverride {
            layout: Some(LegendLayout::Horizontal),
            align: Some(HorizontalAlign::Center),
            vertical_align: Some(VerticalAlign::Bottom),
        };

        Self {
            chart: ChartSection {
                kind: SeriesKind::Line,
                spacing: Some(Spacing::default()),
                reflow: true,
                animation: true,
                background_color: Some("transparent".to_owned()),
            },
            title: TitleOptions::new("Monthly Average Temperature", default_title_font_px()),
            subtitle: Some(TitleOptions::new(format!("Source: {}", dataset.source), 12.0)),
            x_axis: Some(XAxisOptions {
                categories: dataset.categories.clone(),
                label_font_size_px: 14.0,
                tick_width: 1.0,
                line_width: 1.0,
            }),
            y_axis: Some(YAxisOptions {
                title: TitleOptions::new("Temperature (°C)", 14.0),
                label_font_size_px: 13.0,
                grid_line_width: 1.0,
            }),
            legend: Some(LegendOptions {
                layout: LegendLayout::Horizontal,
                align: HorizontalAlign::Center,
                vertical_align: VerticalAlign::Bottom,
                font_size_px: 14.0,
            }),
            plot_options: Some(SeriesDefaults::default()),
            responsive: vec![ResponsiveRule {
                condition: ResponsiveCondition { max_width: 500 },
                chart_options: ResponsiveOverrides {
                    legend: Some(bottom_center_legend),
                },
            }],
            series: dataset
                .cities
                .iter()
                .map(|city| SeriesOptions {
                    name: Some(city.name.clone()),
                    kind: SeriesKind::Line,
                    color: Some(city.color.clone()),
                    data: city.monthly_means.clone(),
                })
                .collect(),
            credits: Some(CreditsOptions {
                enabled: true,
                text: "climate-chart".to_owned(),
                font_size_px: 12.0,
            }),
        }
    }

    /// Applies every responsive rule whose condition matches `container_width`.
    #[must_use]
    pub fn resolved_for_width(&self, container_width: u32) -> Self {
        let mut resolved = self.clone();
        for rule in self.responsive.iter().filter(|rule| rule.matches(container_width)) {
            if let (Some(legend), Some(overrides)) =
                (resolved.legend.as_mut(), rule.chart_options.legend)
            {
                if let Some(layout) = overrides.layout {
                    legend.layout = layout;
                }
                if let Some(align) = overrides.align {
                    legend.align = align;
                }
                if let Some(vertical_align) = overrides.vertical_align {
                    legend.vertical_align = vertical_align;
                }
            }
        }
        resolved
    }

    /// True for the placeholder produced by [`ChartOptions::minimal`].
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.x_axis.is_none()
            && self.y_axis.is_none()
            && self.series.iter().all(|series| series.data.is_empty())
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(x_axis) = &self.x_axis {
            for series in &self.series {
                if series.data.len() > x_axis.categories.len() {
                    return Err(ChartError::InvalidData(format!(
                        "series `{}` has more samples than categories",
                        series.name.as_deref().unwrap_or("<unnamed>")
                    )));
                }
            }
        }
        for series in &self.series {
            if let Some(color) = &series.color {
                Color::from_hex(color)?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|err| ChartError::InvalidData(format!("failed to serialize options: {err}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|err| ChartError::InvalidData(format!("failed to parse options: {err}")))
    }
}
