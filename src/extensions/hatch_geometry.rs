use serde::{Deserialize, Serialize};

use crate::core::PixelRect;
use crate::error::{ChartError, ChartResult};

/// Upper bound on strokes per overlay; larger requests are rejected.
pub const MAX_HATCH_LINES: usize = 10_000;

/// One diagonal hatch stroke in device space, bottom-left to top-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HatchLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Number of strokes needed to cover `rect` once clipped.
///
/// `ceil((width + height) / spacing) + extra_lines`, at most [`MAX_HATCH_LINES`].
pub fn hatch_line_count(rect: PixelRect, spacing: f64, extra_lines: usize) -> ChartResult<usize> {
    validate_spacing(spacing)?;
    rect.validate()?;
    let span = ((rect.width + rect.height) / spacing).ceil();
    if !span.is_finite() || span > MAX_HATCH_LINES as f64 {
        return Err(too_many_lines(span));
    }
    (span as usize)
        .checked_add(extra_lines)
        .filter(|count| *count <= MAX_HATCH_LINES)
        .ok_or_else(|| too_many_lines(span + extra_lines as f64))
}

fn too_many_lines(requested: f64) -> ChartError {
    ChartError::InvalidData(format!(
        "hatch needs {requested} strokes, limit is {MAX_HATCH_LINES}"
    ))
}

/// Tiles 45-degree strokes across `rect` at a fixed pixel spacing.
///
/// The first stroke starts `rect.height` left of the rectangle so its upper
/// end touches the left edge; each stroke rises by `height` over a run of
/// `height`. Strokes are meant to be clipped to `rect`.
pub fn hatch_lines(rect: PixelRect, spacing: f64, extra_lines: usize) -> ChartResult<Vec<HatchLine>> {
    let count = hatch_line_count(rect, spacing, extra_lines)?;
    let start_x = rect.x - rect.height;
    let top = rect.y;
    let bottom = rect.bottom();

    Ok((0..count)
        .map(|index| {
            let line_x = start_x + index as f64 * spacing;
            HatchLine {
                x1: line_x,
                y1: bottom,
                x2: line_x + rect.height,
                y2: top,
            }
        })
        .collect())
}

fn validate_spacing(spacing: f64) -> ChartResult<()> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(ChartError::InvalidData(
            "hatch spacing must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{HatchLine, MAX_HATCH_LINES, hatch_line_count, hatch_lines};
    use crate::core::PixelRect;

    #[test]
    fn worked_example_line_count() {
        let rect = PixelRect::new(40.0, 75.0, 40.0, 100.0);
        // ceil(140 / 12) = 12
        assert_eq!(hatch_line_count(rect, 12.0, 5).expect("count"), 17);
    }

    #[test]
    fn first_stroke_starts_one_height_left() {
        let rect = PixelRect::new(40.0, 75.0, 40.0, 100.0);
        let lines = hatch_lines(rect, 12.0, 5).expect("lines");
        assert_eq!(
            lines[0],
            HatchLine {
                x1: -60.0,
                y1: 175.0,
                x2: 40.0,
                y2: 75.0
            }
        );
        assert_eq!(lines[1].x1, -48.0);
    }

    #[test]
    fn last_stroke_clears_right_edge() {
        let rect = PixelRect::new(40.0, 75.0, 40.0, 100.0);
        let lines = hatch_lines(rect, 12.0, 5).expect("lines");
        let last = lines.last().expect("non-empty");
        assert!(last.x1 >= rect.right());
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let rect = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(hatch_lines(rect, 0.0, 5).is_err());
    }

    #[test]
    fn oversized_requests_are_errors() {
        let rect = PixelRect::new(40.0, 75.0, 40.0, 100.0);
        assert!(hatch_line_count(rect, 1e-300, 5).is_err());
        assert!(hatch_line_count(rect, 12.0, usize::MAX).is_err());
        assert!(hatch_line_count(rect, 12.0, MAX_HATCH_LINES).is_err());
        assert_eq!(
            hatch_line_count(rect, 12.0, MAX_HATCH_LINES - 12).expect("count"),
            MAX_HATCH_LINES
        );
    }
}
