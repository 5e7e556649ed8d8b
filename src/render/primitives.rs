use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};

fn ensure(condition: bool, message: &str) -> VizResult<()> {
    if condition {
        Ok(())
    } else {
        Err(VizError::InvalidData(message.to_owned()))
    }
}

const fn hex_channel(rgb: u32, shift: u32) -> f64 {
    ((rgb >> shift) & 0xFF) as f64 / 255.0
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

/// Straight (non-premultiplied) RGBA, each channel in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color from a `0xRRGGBB` literal, as written in CSS palettes.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::rgba(hex_channel(rgb, 16), hex_channel(rgb, 8), hex_channel(rgb, 0), 1.0)
    }

    /// Same color with alpha multiplied by `factor`; this is how the refresh
    /// dim is applied to every primitive.
    #[must_use]
    pub fn faded(self, factor: f64) -> Self {
        Self {
            alpha: (self.alpha * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn validate(self) -> VizResult<()> {
        let channels = [self.red, self.green, self.blue, self.alpha];
        ensure(
            channels
                .iter()
                .all(|channel| channel.is_finite() && (0.0..=1.0).contains(channel)),
            "color channels must be finite and in [0, 1]",
        )
    }
}

/// Axis domain line or tick mark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> VizResult<()> {
        ensure(
            all_finite(&[self.x1, self.y1, self.x2, self.y2]),
            "axis line endpoints must be finite",
        )?;
        ensure(
            self.stroke_width.is_finite() && self.stroke_width > 0.0,
            "axis stroke width must be finite and > 0",
        )?;
        self.color.validate()
    }
}

/// One bar. Zero height is valid: every bar transition starts there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub fill_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            corner_radius: 0.0,
            fill_color,
        }
    }

    #[must_use]
    pub const fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    /// Bottom edge, i.e. the baseline the bar grows from.
    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    pub fn validate(self) -> VizResult<()> {
        ensure(
            all_finite(&[self.x, self.y, self.width, self.height, self.corner_radius]),
            "bar geometry must be finite",
        )?;
        ensure(
            self.width >= 0.0 && self.height >= 0.0 && self.corner_radius >= 0.0,
            "bar size and corner radius must be >= 0",
        )?;
        self.fill_color.validate()
    }
}

/// Horizontal anchor of a label relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Tick label, axis title or placeholder message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    /// Clockwise rotation around `(x, y)` in degrees; `-90` for the value
    /// axis title.
    #[serde(default)]
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> VizResult<()> {
        ensure(!self.text.is_empty(), "label text must not be empty")?;
        ensure(
            all_finite(&[self.x, self.y, self.rotation_deg]),
            "label position and rotation must be finite",
        )?;
        ensure(
            self.font_size_px.is_finite() && self.font_size_px > 0.0,
            "label font size must be finite and > 0",
        )?;
        self.color.validate()
    }
}
