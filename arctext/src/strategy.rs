//! The two rendering strategies behind one trait.
//!
//! Vector re-renders glyph outlines on the live target every frame and keeps
//! fidelity under any zoom. Bitmap rasterizes once per layout to an offscreen
//! surface, trims the transparent border and blits the result, trading crisp
//! scaling for cheap redraws.

use crate::canvas::PixmapCanvas;
use crate::fonts::FontContext;
use crate::layout::{compute_layout, flat_extent, ArcLayout};
use crate::render::{render_text, DrawContext};
use crate::style::ArcTextStyle;
use crate::trim::{trim_transparent, TrimmedBitmap};

/// Which rendering strategy a curved-text object uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Draw glyph outlines directly on the live context.
    #[default]
    Vector,
    /// Pre-render to a trimmed offscreen bitmap, blit at render time.
    Bitmap,
}

/// Bounding box reported by a layout pass, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

/// One of the two ways of turning a style into pixels.
///
/// `layout` runs after every layout-affecting mutation and reports the
/// object's bounding box; `render` paints whatever `layout` prepared. The
/// context origin is the center of that box.
pub trait LayoutStrategy {
    /// Recompute cached state for `style` and report the bounding box.
    fn layout(&mut self, style: &ArcTextStyle, fonts: &mut FontContext) -> Extent;

    /// Paint the most recently laid-out state.
    fn render(&self, ctx: &mut dyn DrawContext, style: &ArcTextStyle);

    /// Where the trimmed bitmap sat inside its raw raster. Always `(0, 0)`
    /// for the vector strategy.
    fn offsets(&self) -> (u32, u32) {
        (0, 0)
    }
}

/// Draws glyphs straight onto the live context using the arc transforms.
#[derive(Debug, Default)]
pub struct VectorStrategy {
    layout: Option<ArcLayout>,
}

impl VectorStrategy {
    /// The layout computed by the last [`LayoutStrategy::layout`] call.
    pub fn current_layout(&self) -> Option<&ArcLayout> {
        self.layout.as_ref()
    }
}

impl LayoutStrategy for VectorStrategy {
    fn layout(&mut self, style: &ArcTextStyle, fonts: &mut FontContext) -> Extent {
        let layout = compute_layout(style, |ch| fonts.char_width(&style.font, ch));
        let extent = Extent {
            width: layout.width,
            height: layout.height,
        };
        self.layout = Some(layout);
        extent
    }

    fn render(&self, ctx: &mut dyn DrawContext, style: &ArcTextStyle) {
        // Nothing to paint until the first layout pass.
        let Some(layout) = &self.layout else {
            return;
        };
        render_text(ctx, style, layout);
    }
}

/// Pre-renders the text to an offscreen surface, trims it and blits the
/// result centered on the object.
#[derive(Default)]
pub struct BitmapStrategy {
    bitmap: Option<TrimmedBitmap>,
}

impl BitmapStrategy {
    /// The trimmed raster from the last layout pass.
    pub fn bitmap(&self) -> Option<&TrimmedBitmap> {
        self.bitmap.as_ref()
    }

    /// Rasterize `style` onto a fresh offscreen surface.
    ///
    /// Curved text gets a `4 * radius` square so every start angle fits; a
    /// zero span gets the flat text box. Returns `None` when the surface has
    /// no drawable area.
    fn rasterize(
        style: &ArcTextStyle,
        layout: &ArcLayout,
        fonts: &mut FontContext,
    ) -> Option<PixmapCanvas> {
        let (width, height) = if layout.angle_span == 0.0 {
            flat_extent(layout.total_width, style.font.size_px)
        } else {
            let side = (layout.radius * 4.0).round();
            (side, side)
        };

        let mut canvas = PixmapCanvas::new(width as u32, height as u32).ok()?;
        let mut painter = canvas.painter(fonts);
        painter.translate(width / 2.0, height / 2.0);
        render_text(&mut painter, style, layout);
        Some(canvas)
    }
}

impl LayoutStrategy for BitmapStrategy {
    fn layout(&mut self, style: &ArcTextStyle, fonts: &mut FontContext) -> Extent {
        let layout = compute_layout(style, |ch| fonts.char_width(&style.font, ch));

        let Some(canvas) = Self::rasterize(style, &layout, fonts) else {
            self.bitmap = None;
            return Extent::default();
        };

        let trimmed = trim_transparent(canvas.into_pixmap());
        let extent = Extent {
            width: trimmed.width() as f32,
            height: trimmed.height() as f32,
        };
        self.bitmap = Some(trimmed);
        extent
    }

    fn render(&self, ctx: &mut dyn DrawContext, _style: &ArcTextStyle) {
        let Some(bitmap) = &self.bitmap else {
            return;
        };
        // The trim offsets are deliberately not applied; the bitmap is
        // centered on the bounding box it produced.
        let width = bitmap.width() as f32;
        let height = bitmap.height() as f32;
        ctx.draw_bitmap(bitmap, -width / 2.0, -height / 2.0);
    }

    fn offsets(&self) -> (u32, u32) {
        match &self.bitmap {
            Some(bitmap) => (bitmap.offset_x, bitmap.offset_y),
            None => (0, 0),
        }
    }
}
