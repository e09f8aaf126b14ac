use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{OverlayRegion, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::HatchStyle;
use crate::interaction::ResizePolicy;

/// Chart host bootstrap configuration.
///
/// Serializable so embedding applications can keep it next to their own
/// settings; every field falls back to the defaults of the temperature page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Initial container size handed to the chart backend.
    #[serde(default)]
    pub container: Viewport,
    /// Wait before the first overlay draw when no layout-settled signal arrives.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Reflow triggered by the chart's load event.
    #[serde(default = "default_load_reflow_delay_ms")]
    pub load_reflow_delay_ms: u64,
    /// Reflow forcing a re-measure shortly after the first paint.
    #[serde(default = "default_post_init_reflow_delay_ms")]
    pub post_init_reflow_delay_ms: u64,
    #[serde(default)]
    pub overlay_region: OverlayRegion,
    #[serde(default)]
    pub hatch_style: HatchStyle,
    #[serde(default)]
    pub resize_policy: ResizePolicy,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            container: Viewport::default(),
            settle_delay_ms: default_settle_delay_ms(),
            load_reflow_delay_ms: default_load_reflow_delay_ms(),
            post_init_reflow_delay_ms: default_post_init_reflow_delay_ms(),
            overlay_region: OverlayRegion::default(),
            hatch_style: HatchStyle::default(),
            resize_policy: ResizePolicy::default(),
        }
    }
}

impl HostConfig {
    #[must_use]
    pub fn with_container(mut self, container: Viewport) -> Self {
        self.container = container;
        self
    }

    #[must_use]
    pub fn with_settle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.settle_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_overlay_region(mut self, region: OverlayRegion) -> Self {
        self.overlay_region = region;
        self
    }

    #[must_use]
    pub fn with_hatch_style(mut self, style: HatchStyle) -> Self {
        self.hatch_style = style;
        self
    }

    #[must_use]
    pub fn with_resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize_policy = policy;
        self
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn load_reflow_delay(&self) -> Duration {
        Duration::from_millis(self.load_reflow_delay_ms)
    }

    #[must_use]
    pub fn post_init_reflow_delay(&self) -> Duration {
        Duration::from_millis(self.post_init_reflow_delay_ms)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.container.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.container.width,
                height: self.container.height,
            });
        }
        self.overlay_region
            .validate()
            .map_err(|err| ChartError::Config(format!("overlay_region: {err}")))?;
        self.hatch_style
            .validate()
            .map_err(|err| ChartError::Config(format!("hatch_style: {err}")))?;
        self.resize_policy.validate()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| ChartError::Config(format!("failed to parse host config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ChartError::Config(format!("failed to serialize host config: {err}")))
    }
}

fn default_settle_delay_ms() -> u64 {
    200
}

fn default_load_reflow_delay_ms() -> u64 {
    100
}

fn default_post_init_reflow_delay_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::HostConfig;
    use crate::core::OverlayRegion;
    use crate::interaction::ResizePolicy;

    #[test]
    fn empty_json_yields_defaults() {
        let config = HostConfig::from_json_str("{}").expect("config");
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.settle_delay_ms, 200);
        assert_eq!(config.overlay_region, OverlayRegion::new(4.0, 8.0, 25.0, 5.0));
    }

    #[test]
    fn partial_json_overrides_selected_fields() {
        let config = HostConfig::from_json_str(
            r#"{
                "settle_delay_ms": 50,
                "overlay_region": { "x_min": 0, "x_max": 3, "y_min": 10, "y_max": 0 },
                "resize_policy": { "mode": "coalesce", "window_ms": 100 }
            }"#,
        )
        .expect("config");
        assert_eq!(config.settle_delay_ms, 50);
        assert_eq!(config.overlay_region.x_max, 3.0);
        assert_eq!(config.resize_policy, ResizePolicy::Coalesce { window_ms: 100 });
        assert_eq!(config.load_reflow_delay_ms, 100);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(HostConfig::from_json_str(r#"{"container": {"width": 0, "height": 10}}"#).is_err());
        assert!(
            HostConfig::from_json_str(r#"{"hatch_style": {"spacing_px": -1}}"#).is_err()
        );
        assert!(HostConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn runaway_hatch_styles_are_rejected() {
        assert!(
            HostConfig::from_json_str(r#"{"hatch_style": {"spacing_px": 1e-300}}"#).is_err()
        );
        assert!(HostConfig::from_json_str(r#"{"hatch_style": {"spacing_px": 0.5}}"#).is_err());
        assert!(
            HostConfig::from_json_str(
                r#"{"hatch_style": {"extra_lines": 18446744073709551615}}"#
            )
            .is_err()
        );
        assert!(HostConfig::from_json_str(r#"{"hatch_style": {"extra_lines": 65}}"#).is_err());
        let config =
            HostConfig::from_json_str(r#"{"hatch_style": {"spacing_px": 1, "extra_lines": 64}}"#)
                .expect("config");
        assert_eq!(config.hatch_style.extra_lines, 64);
    }

    #[test]
    fn pretty_json_round_trips() {
        let config = HostConfig::default().with_settle_delay_ms(10);
        let json = config.to_json_pretty().expect("json");
        assert_eq!(HostConfig::from_json_str(&json).expect("parse"), config);
    }
}
