use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PixelRect;
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels and a 0..=1 alpha, as CSS `rgba()` does.
    #[must_use]
    pub fn rgba8(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self::rgba(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            alpha,
        )
    }

    /// Parses `#RRGGBB`.
    pub fn from_hex(hex: &str) -> ChartResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ChartError::InvalidData(format!(
                "expected #RRGGBB color, got `{hex}`"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ChartError::InvalidData(format!("invalid hex color `{hex}`")))
        };
        Ok(Self::rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 1.0))
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// CSS serialization used by the SVG writer.
    #[must_use]
    pub fn to_css(self) -> String {
        let to_byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            to_byte(self.red),
            to_byte(self.green),
            to_byte(self.blue),
            (self.alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Close,
}

pub type PathData = SmallVec<[PathCommand; 4]>;

/// Two-command path from `(x1, y1)` to `(x2, y2)`.
#[must_use]
pub fn segment_path(x1: f64, y1: f64, x2: f64, y2: f64) -> PathData {
    let mut data = PathData::new();
    data.push(PathCommand::MoveTo(x1, y1));
    data.push(PathCommand::LineTo(x2, y2));
    data
}

/// Horizontal anchor relative to `TextShape::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub anchor: TextAnchor,
}

impl TextShape {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64, font_size_px: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            anchor: TextAnchor::Middle,
        }
    }

    #[must_use]
    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Geometry carried by one scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Group,
    Rect(PixelRect),
    Circle { cx: f64, cy: f64, radius: f64 },
    Path(PathData),
    Text(TextShape),
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Rect(_) => "rect",
            Self::Circle { .. } => "circle",
            Self::Path(_) => "path",
            Self::Text(_) => "text",
        }
    }

    #[must_use]
    pub fn polyline(points: &[(f64, f64)]) -> Self {
        let mut data = PathData::with_capacity(points.len());
        for (index, &(x, y)) in points.iter().enumerate() {
            data.push(if index == 0 {
                PathCommand::MoveTo(x, y)
            } else {
                PathCommand::LineTo(x, y)
            });
        }
        Self::Path(data)
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Group => Ok(()),
            Self::Rect(rect) => rect.validate(),
            Self::Circle { cx, cy, radius } => {
                if !cx.is_finite() || !cy.is_finite() || !radius.is_finite() || *radius < 0.0 {
                    return Err(ChartError::InvalidData(
                        "circle geometry must be finite with radius >= 0".to_owned(),
                    ));
                }
                Ok(())
            }
            Self::Path(data) => {
                let finite = data.iter().all(|command| match command {
                    PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => {
                        x.is_finite() && y.is_finite()
                    }
                    PathCommand::Close => true,
                });
                if !finite {
                    return Err(ChartError::InvalidData(
                        "path coordinates must be finite".to_owned(),
                    ));
                }
                Ok(())
            }
            Self::Text(text) => {
                if !text.x.is_finite() || !text.y.is_finite() {
                    return Err(ChartError::InvalidData(
                        "text coordinates must be finite".to_owned(),
                    ));
                }
                if !text.font_size_px.is_finite() || text.font_size_px <= 0.0 {
                    return Err(ChartError::InvalidData(
                        "font size must be finite and > 0".to_owned(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Presentation attributes applied through the fluent builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
    /// Paint order among siblings; ties keep insertion order.
    pub z_index: i32,
    pub clip_path: Option<String>,
}

impl Attributes {
    pub fn validate(&self) -> ChartResult<()> {
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        if let Some(width) = self.stroke_width {
            if !width.is_finite() || width < 0.0 {
                return Err(ChartError::InvalidData(
                    "stroke width must be finite and >= 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, PathCommand, Shape};

    #[test]
    fn hex_colors_parse_to_normalized_channels() {
        let color = Color::from_hex("#0099FF").expect("valid hex");
        assert_eq!(color.to_css(), "rgba(0, 153, 255, 1)");
        assert!(Color::from_hex("#09F").is_err());
    }

    #[test]
    fn css_output_keeps_byte_channels() {
        assert_eq!(
            Color::rgba8(173, 216, 250, 0.7).to_css(),
            "rgba(173, 216, 250, 0.7)"
        );
    }

    #[test]
    fn polyline_starts_with_move() {
        let Shape::Path(data) = Shape::polyline(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]) else {
            panic!("expected path");
        };
        assert_eq!(data[0], PathCommand::MoveTo(0.0, 0.0));
        assert_eq!(data.len(), 3);
    }
}
