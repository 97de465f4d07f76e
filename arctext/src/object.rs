//! The curved-text drawable object.
//!
//! [`ArcText`] owns its style, its rendering strategy and the strategy's
//! cached layout. Every layout-affecting setter recomputes the bounding box
//! synchronously, except while an edit session is active; appearance setters
//! only mark the object for redraw.

use crate::error::ArcTextResult;
use crate::font::FontSpec;
use crate::fonts::FontContext;
use crate::layout::flat_extent;
use crate::render::{render_flat, DrawContext};
use crate::strategy::{BitmapStrategy, Extent, LayoutStrategy, StrategyKind, VectorStrategy};
use crate::style::{ArcTextStyle, CanvasColor};
use serde::{Deserialize, Serialize};

/// Construction options for [`ArcText`].
#[derive(Debug, Clone)]
pub struct ArcTextOptions {
    /// CSS font declaration, e.g. `"bold 24px sans-serif"`.
    pub font: String,
    /// Fill color, any CSS color string.
    pub fill: String,
    /// Stroke color; `None` disables stroking.
    pub stroke: Option<String>,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// Curvature percentage in `[-100, 100]`; 0 renders flat.
    pub diameter: f32,
    /// Extra advance per character, in pixels.
    pub kerning: f32,
    /// Mirror the text to the inside of the arc.
    pub flipped: bool,
    /// Rotation of the whole arc, in degrees.
    pub start_angle: f32,
    /// Rendering strategy.
    pub mode: StrategyKind,
}

impl Default for ArcTextOptions {
    fn default() -> Self {
        Self {
            font: "10px sans-serif".to_string(),
            fill: "#000000".to_string(),
            stroke: None,
            stroke_width: 1.0,
            diameter: 0.0,
            kerning: 0.0,
            flipped: false,
            start_angle: 180.0,
            mode: StrategyKind::Vector,
        }
    }
}

/// Serialized form of an [`ArcText`].
///
/// The curve fields carry defaults so records written before a field existed
/// still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcTextRecord {
    pub text: String,
    pub font: String,
    pub fill: String,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default)]
    pub diameter: f32,
    #[serde(default)]
    pub kerning: f32,
    #[serde(default)]
    pub flipped: bool,
    #[serde(default = "default_start_angle")]
    pub start_angle: f32,
}

fn default_stroke_width() -> f32 {
    1.0
}

fn default_start_angle() -> f32 {
    180.0
}

/// Text rendered along a circular arc.
pub struct ArcText {
    style: ArcTextStyle,
    strategy: Box<dyn LayoutStrategy>,
    mode: StrategyKind,
    extent: Extent,
    editing: bool,
    needs_redraw: bool,
}

impl ArcText {
    /// Build an object and run its first layout pass.
    pub fn new(
        text: impl Into<String>,
        options: ArcTextOptions,
        fonts: &mut FontContext,
    ) -> ArcTextResult<Self> {
        let font = FontSpec::parse(&options.font)?;
        let fill = CanvasColor::parse(&options.fill)?;
        let stroke = options
            .stroke
            .as_deref()
            .map(CanvasColor::parse)
            .transpose()?;

        let style = ArcTextStyle {
            text: text.into(),
            font,
            fill,
            stroke,
            stroke_width: options.stroke_width,
            kerning: options.kerning,
            diameter: options.diameter,
            flipped: options.flipped,
            start_angle: options.start_angle,
        };

        let strategy: Box<dyn LayoutStrategy> = match options.mode {
            StrategyKind::Vector => Box::<VectorStrategy>::default(),
            StrategyKind::Bitmap => Box::<BitmapStrategy>::default(),
        };

        let mut object = Self {
            style,
            strategy,
            mode: options.mode,
            extent: Extent::default(),
            editing: false,
            needs_redraw: true,
        };
        object.recompute(fonts);
        Ok(object)
    }

    /// Rebuild an object from its serialized record.
    pub fn from_object(
        record: &ArcTextRecord,
        mode: StrategyKind,
        fonts: &mut FontContext,
    ) -> ArcTextResult<Self> {
        let options = ArcTextOptions {
            font: record.font.clone(),
            fill: record.fill.clone(),
            stroke: record.stroke.clone(),
            stroke_width: record.stroke_width,
            diameter: record.diameter,
            kerning: record.kerning,
            flipped: record.flipped,
            start_angle: record.start_angle,
            mode,
        };
        Self::new(record.text.clone(), options, fonts)
    }

    /// Serialize the object's style into a record.
    pub fn to_object(&self) -> ArcTextRecord {
        ArcTextRecord {
            text: self.style.text.clone(),
            font: self.style.font.to_string(),
            fill: self.style.fill.to_css_hex(),
            stroke: self.style.stroke.map(|c| c.to_css_hex()),
            stroke_width: self.style.stroke_width,
            diameter: self.style.diameter,
            kerning: self.style.kerning,
            flipped: self.style.flipped,
            start_angle: self.style.start_angle,
        }
    }

    fn recompute(&mut self, fonts: &mut FontContext) {
        if self.editing {
            return;
        }
        log::debug!(target: "arctext", "recompute layout for {:?}", self.style.text);
        self.extent = self.strategy.layout(&self.style, fonts);
        self.needs_redraw = true;
    }

    /// Bounding-box width in pixels.
    pub fn width(&self) -> f32 {
        self.extent.width
    }

    /// Bounding-box height in pixels.
    pub fn height(&self) -> f32 {
        self.extent.height
    }

    pub fn text(&self) -> &str {
        &self.style.text
    }

    pub fn diameter(&self) -> f32 {
        self.style.diameter
    }

    pub fn kerning(&self) -> f32 {
        self.style.kerning
    }

    pub fn flipped(&self) -> bool {
        self.style.flipped
    }

    pub fn start_angle(&self) -> f32 {
        self.style.start_angle
    }

    pub fn font_size(&self) -> f32 {
        self.style.font.size_px
    }

    pub fn mode(&self) -> StrategyKind {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// The style snapshot the next render will use.
    pub fn style(&self) -> &ArcTextStyle {
        &self.style
    }

    /// Trim offsets of the current bitmap; `(0, 0)` for the vector strategy.
    pub fn bitmap_offsets(&self) -> (u32, u32) {
        self.strategy.offsets()
    }

    /// True once a mutation or edit-session exit invalidated the last frame.
    /// Cleared by [`render`](Self::render) and by this call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn set_text(&mut self, text: impl Into<String>, fonts: &mut FontContext) {
        self.style.text = text.into();
        self.recompute(fonts);
    }

    pub fn set_diameter(&mut self, diameter: f32, fonts: &mut FontContext) {
        self.style.diameter = diameter;
        self.recompute(fonts);
    }

    pub fn set_kerning(&mut self, kerning: f32, fonts: &mut FontContext) {
        self.style.kerning = kerning;
        self.recompute(fonts);
    }

    pub fn set_flipped(&mut self, flipped: bool, fonts: &mut FontContext) {
        self.style.flipped = flipped;
        self.recompute(fonts);
    }

    pub fn set_start_angle(&mut self, degrees: f32, fonts: &mut FontContext) {
        self.style.start_angle = degrees;
        self.recompute(fonts);
    }

    pub fn set_font_size(&mut self, size_px: f32, fonts: &mut FontContext) {
        self.style.font.size_px = size_px;
        self.recompute(fonts);
    }

    /// Replace the whole font declaration.
    pub fn set_font(&mut self, declaration: &str, fonts: &mut FontContext) -> ArcTextResult<()> {
        self.style.font = FontSpec::parse(declaration)?;
        self.recompute(fonts);
        Ok(())
    }

    /// Set the fill color. Appearance only, the layout stands.
    pub fn set_fill(&mut self, color: &str) -> ArcTextResult<()> {
        self.style.fill = CanvasColor::parse(color)?;
        self.needs_redraw = true;
        Ok(())
    }

    /// Set or clear the stroke color. Appearance only.
    pub fn set_stroke(&mut self, color: Option<&str>) -> ArcTextResult<()> {
        self.style.stroke = color.map(CanvasColor::parse).transpose()?;
        self.needs_redraw = true;
        Ok(())
    }

    /// Set the stroke width. Appearance only.
    pub fn set_stroke_width(&mut self, width: f32) {
        self.style.stroke_width = width;
        self.needs_redraw = true;
    }

    /// Begin an edit session.
    ///
    /// Layout recompute is suspended and the bounding box switches to the
    /// flat text metrics, so a host caret and selection UI can work on a
    /// plain rectangle. Rendering flattens too until the session ends.
    pub fn enter_editing(&mut self, fonts: &mut FontContext) {
        log::debug!(target: "arctext", "enter editing");
        self.editing = true;

        let mut total_width = 0.0;
        for ch in self.style.text.chars() {
            total_width += fonts.char_width(&self.style.font, ch) + self.style.kerning;
        }
        let (width, height) = flat_extent(total_width, self.style.font.size_px);
        self.extent = Extent { width, height };
        self.needs_redraw = true;
    }

    /// End the edit session, recompute the curved layout and request a
    /// redraw.
    pub fn exit_editing(&mut self, fonts: &mut FontContext) {
        log::debug!(target: "arctext", "exit editing");
        self.editing = false;
        self.recompute(fonts);
    }

    /// Paint the object. The context origin must sit at the center of the
    /// bounding box. While editing this paints the flat representation.
    pub fn render(&mut self, ctx: &mut dyn DrawContext) {
        self.needs_redraw = false;
        if self.editing {
            render_flat(ctx, &self.style, self.extent.width, self.extent.height);
        } else {
            self.strategy.render(ctx, &self.style);
        }
    }
}
