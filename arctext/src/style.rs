//! Colors, text state enums and the style snapshot a render pass consumes.

use crate::error::{ArcTextError, ArcTextResult};
use crate::font::FontSpec;

/// An RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl CanvasColor {
    /// Opaque black, the canvas default.
    pub const BLACK: CanvasColor = CanvasColor::from_rgba8(0, 0, 0, 255);

    /// Create a color from 8-bit RGBA components.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from floating-point RGBA components (each in 0.0..=1.0).
    pub fn from_rgba_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            g: (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            b: (b.clamp(0.0, 1.0) * 255.0).round() as u8,
            a: (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    /// Parse a CSS color string (`#rrggbb`, `rgb(..)`, named colors and so on).
    pub fn parse(s: &str) -> ArcTextResult<Self> {
        let parsed = csscolorparser::parse(s)
            .map_err(|e| ArcTextError::ColorParseError(format!("{}: {}", s, e)))?;

        let [r, g, b, a] = parsed.to_array();
        Ok(Self::from_rgba_f32(r, g, b, a))
    }

    /// Format the color as a `#rrggbbaa` hex string.
    pub fn to_css_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<CanvasColor> for tiny_skia::Color {
    fn from(c: CanvasColor) -> Self {
        tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

/// Horizontal anchoring of drawn text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Align text to the left of the anchor point.
    #[default]
    Left,
    /// Align text to the right of the anchor point.
    Right,
    /// Center text on the anchor point.
    Center,
}

/// Vertical anchoring of drawn text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Middle of the em square.
    Middle,
    /// Normal alphabetic baseline.
    #[default]
    Alphabetic,
    /// Bottom of the em square.
    Bottom,
}

/// Everything one layout or render pass needs to know about the text.
///
/// `diameter` is a signed curvature percentage in `[-100, 100]`; negative
/// values bend the text the other way and `0` renders it flat. `start_angle`
/// rotates the whole arc, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcTextStyle {
    pub text: String,
    pub font: FontSpec,
    pub fill: CanvasColor,
    pub stroke: Option<CanvasColor>,
    pub stroke_width: f32,
    pub kerning: f32,
    pub diameter: f32,
    pub flipped: bool,
    pub start_angle: f32,
}

impl Default for ArcTextStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontSpec::default(),
            fill: CanvasColor::BLACK,
            stroke: None,
            stroke_width: 1.0,
            kerning: 0.0,
            diameter: 0.0,
            flipped: false,
            start_angle: 180.0,
        }
    }
}
