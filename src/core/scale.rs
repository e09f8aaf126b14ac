use crate::error::{ChartError, ChartResult};

/// Affine mapping from a numeric domain onto a pixel range.
///
/// The range may be descending (`range_start > range_end`), which is how
/// value axes place larger values higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Err(ChartError::InvalidData(
                "scale range is collapsed".to_owned(),
            ));
        }
        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

#[cfg(test)]
mod tests {
    use super::LinearScale;
    use approx::assert_relative_eq;

    #[test]
    fn descending_range_inverts_values() {
        let scale = LinearScale::new(0.0, 40.0, 200.0, 0.0).expect("valid scale");
        assert_relative_eq!(scale.domain_to_pixel(25.0).expect("to pixel"), 75.0);
        assert_relative_eq!(scale.domain_to_pixel(5.0).expect("to pixel"), 175.0);
        assert_relative_eq!(scale.pixel_to_domain(75.0).expect("to domain"), 25.0);
    }

    #[test]
    fn rejects_degenerate_domain() {
        assert!(LinearScale::new(3.0, 3.0, 0.0, 100.0).is_err());
        assert!(LinearScale::new(f64::NAN, 3.0, 0.0, 100.0).is_err());
    }
}
