use serde::{Deserialize, Serialize};

use crate::core::LinearScale;
use crate::error::{ChartError, ChartResult};

/// Pixel distance the value axis aims to keep between ticks.
const VALUE_TICK_PIXEL_INTERVAL: f64 = 72.0;

/// Domain-to-device mapping for one axis, valid for the current layout only.
pub trait AxisTransform {
    fn to_pixels(&self, value: f64) -> ChartResult<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisKind {
    /// Evenly spaced categories; index `i` sits in the middle of band `i`.
    Category { categories: Vec<String> },
    /// Continuous values padded out to a "nice" tick interval at layout time.
    Value { data_min: f64, data_max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    orientation: AxisOrientation,
    kind: AxisKind,
    tick_interval: f64,
    scale: Option<LinearScale>,
}

impl Axis {
    pub fn category(categories: Vec<String>) -> ChartResult<Self> {
        if categories.is_empty() {
            return Err(ChartError::InvalidData(
                "category axis needs at least one category".to_owned(),
            ));
        }
        Ok(Self {
            orientation: AxisOrientation::Horizontal,
            kind: AxisKind::Category { categories },
            tick_interval: 1.0,
            scale: None,
        })
    }

    pub fn value(data_min: f64, data_max: f64) -> ChartResult<Self> {
        if !data_min.is_finite() || !data_max.is_finite() || data_min > data_max {
            return Err(ChartError::InvalidData(format!(
                "value axis extent must be finite and ordered, got [{data_min}, {data_max}]"
            )));
        }
        Ok(Self {
            orientation: AxisOrientation::Vertical,
            kind: AxisKind::Value { data_min, data_max },
            tick_interval: 1.0,
            scale: None,
        })
    }

    /// Builds a value axis covering `values`, falling back to `[0, 1]` when empty.
    pub fn value_from_samples<'a>(values: impl IntoIterator<Item = &'a f64>) -> ChartResult<Self> {
        let mut extent: Option<(f64, f64)> = None;
        for &value in values {
            if !value.is_finite() {
                continue;
            }
            extent = Some(match extent {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
        let (min, max) = extent.unwrap_or((0.0, 1.0));
        Self::value(min, max)
    }

    #[must_use]
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    #[must_use]
    pub fn kind(&self) -> &AxisKind {
        &self.kind
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        match &self.kind {
            AxisKind::Category { categories } => categories,
            AxisKind::Value { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.scale.is_some()
    }

    #[must_use]
    pub fn tick_interval(&self) -> f64 {
        self.tick_interval
    }

    /// Current domain extent, available once the axis has a layout.
    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.scale.map(LinearScale::domain)
    }

    /// Binds the axis to a pixel span. `range_start` receives the domain minimum.
    pub fn lay_out(&mut self, range_start: f64, range_end: f64) -> ChartResult<()> {
        let (domain_start, domain_end) = match &self.kind {
            AxisKind::Category { categories } => (-0.5, categories.len() as f64 - 0.5),
            AxisKind::Value { data_min, data_max } => {
                let length = (range_end - range_start).abs();
                let target_ticks = (length / VALUE_TICK_PIXEL_INTERVAL).floor().max(2.0);
                let (min, max, interval) = nice_extent(*data_min, *data_max, target_ticks);
                self.tick_interval = interval;
                (min, max)
            }
        };
        self.scale = Some(LinearScale::new(
            domain_start,
            domain_end,
            range_start,
            range_end,
        )?);
        Ok(())
    }

    pub fn invalidate_layout(&mut self) {
        self.scale = None;
    }

    /// Tick positions in domain space.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        match (&self.kind, self.scale) {
            (AxisKind::Category { categories }, _) => {
                (0..categories.len()).map(|index| index as f64).collect()
            }
            (AxisKind::Value { .. }, Some(scale)) => {
                let (min, max) = scale.domain();
                let steps = ((max - min) / self.tick_interval).round() as usize;
                (0..=steps)
                    .map(|step| min + step as f64 * self.tick_interval)
                    .collect()
            }
            (AxisKind::Value { .. }, None) => Vec::new(),
        }
    }

    fn label(&self) -> &'static str {
        match self.orientation {
            AxisOrientation::Horizontal => "x",
            AxisOrientation::Vertical => "y",
        }
    }
}

impl AxisTransform for Axis {
    fn to_pixels(&self, value: f64) -> ChartResult<f64> {
        let scale = self.scale.ok_or(ChartError::AxisNotLaidOut { axis: self.label() })?;
        scale.domain_to_pixel(value)
    }
}

/// Expands `[min, max]` outward to multiples of a 1/2/2.5/5 tick interval.
#[must_use]
pub fn nice_extent(min: f64, max: f64, target_ticks: f64) -> (f64, f64, f64) {
    let (min, max) = if min == max {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    };
    let raw = (max - min) / target_ticks.max(1.0);
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let multiple = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|candidate| normalized <= *candidate)
        .unwrap_or(10.0);
    let interval = multiple * magnitude;

    (
        (min / interval).floor() * interval,
        (max / interval).ceil() * interval,
        interval,
    )
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisTransform, nice_extent};
    use crate::error::ChartError;
    use approx::assert_relative_eq;

    #[test]
    fn untouched_axis_refuses_transform() {
        let axis = Axis::value(0.0, 10.0).expect("axis");
        let err = axis.to_pixels(5.0).expect_err("no layout yet");
        assert!(matches!(err, ChartError::AxisNotLaidOut { axis: "y" }));
    }

    #[test]
    fn category_index_lands_mid_band() {
        let mut axis = Axis::category(vec!["a".into(), "b".into()]).expect("axis");
        axis.lay_out(0.0, 200.0).expect("layout");
        assert_relative_eq!(axis.to_pixels(0.0).expect("px"), 50.0);
        assert_relative_eq!(axis.to_pixels(1.0).expect("px"), 150.0);
    }

    #[test]
    fn nice_extent_covers_temperature_range() {
        let (min, max, interval) = nice_extent(-0.2, 26.5, 6.0);
        assert_relative_eq!(interval, 5.0);
        assert_relative_eq!(min, -5.0);
        assert_relative_eq!(max, 30.0);
    }

    #[test]
    fn value_ticks_follow_interval() {
        let mut axis = Axis::value(-0.2, 26.5).expect("axis");
        axis.lay_out(432.0, 0.0).expect("layout");
        let ticks = axis.ticks();
        assert_relative_eq!(ticks[0], -5.0);
        assert_relative_eq!(*ticks.last().expect("ticks"), 30.0);
    }

    #[test]
    fn invalidating_layout_drops_transform() {
        let mut axis = Axis::value(0.0, 10.0).expect("axis");
        axis.lay_out(100.0, 0.0).expect("layout");
        assert!(axis.to_pixels(1.0).is_ok());
        axis.invalidate_layout();
        assert!(axis.to_pixels(1.0).is_err());
    }
}
