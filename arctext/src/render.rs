//! Per-character placement along the arc.
//!
//! Both strategies funnel through [`render_text`]: the vector strategy hands
//! it the live target, the bitmap strategy an offscreen surface. The context
//! origin must sit at the center of the object's bounding box in either case.

use crate::font::FontSpec;
use crate::layout::ArcLayout;
use crate::style::{ArcTextStyle, CanvasColor, TextAlign, TextBaseline};
use crate::trim::TrimmedBitmap;
use std::f32::consts::PI;

/// The drawing surface the renderers paint through.
///
/// A deliberately narrow Canvas-2D-shaped subset: transform stack, text
/// state, text drawing, bitmap blitting and per-character measurement. The
/// crate implements it for [`PixmapPainter`](crate::PixmapPainter); a host
/// canvas library can provide its own.
pub trait DrawContext {
    /// Push the current drawing state.
    fn save(&mut self);
    /// Pop the most recently saved drawing state.
    fn restore(&mut self);
    /// Translate the current transform.
    fn translate(&mut self, dx: f32, dy: f32);
    /// Rotate the current transform counterclockwise-negative, like Canvas 2D.
    fn rotate(&mut self, radians: f32);
    /// Set the font used by text operations.
    fn set_font(&mut self, font: &FontSpec);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn set_fill_color(&mut self, color: CanvasColor);
    fn set_stroke_color(&mut self, color: CanvasColor);
    fn set_line_width(&mut self, width: f32);
    /// Fill `text` anchored at `(x, y)` under the current state.
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    /// Stroke `text` anchored at `(x, y)` under the current state.
    fn stroke_text(&mut self, text: &str, x: f32, y: f32);
    /// Blit a trimmed bitmap with its top-left corner at `(dx, dy)`.
    fn draw_bitmap(&mut self, bitmap: &TrimmedBitmap, dx: f32, dy: f32);
    /// Advance width of one character under the current font.
    fn char_width(&mut self, ch: char) -> f32;
}

/// Paint `style` along the arc described by `layout`.
///
/// A zero span falls back to flat rendering; everything else places one
/// character per angular step, upright on the outside of the arc, or mirrored
/// to the inside when the style is flipped.
pub fn render_text(ctx: &mut dyn DrawContext, style: &ArcTextStyle, layout: &ArcLayout) {
    if layout.angle_span == 0.0 {
        render_flat(ctx, style, layout.width, layout.height);
    } else {
        render_arc(ctx, style, layout);
    }
}

fn render_arc(ctx: &mut dyn DrawContext, style: &ArcTextStyle, layout: &ArcLayout) {
    log::debug!(
        target: "arctext",
        "render arc: {} chars over {:.3} rad at radius {:.1}",
        style.text.chars().count(),
        layout.angle_span,
        layout.radius
    );

    ctx.save();
    ctx.set_font(&style.font);
    ctx.set_text_align(TextAlign::Center);
    ctx.set_text_baseline(TextBaseline::Middle);
    ctx.set_fill_color(style.fill);

    ctx.rotate(style.start_angle.to_radians());
    ctx.rotate(-layout.angle_span / 2.0);

    // Baseline sits at the radius; flipping moves the text to the far side
    // of the center and turns each glyph to stay readable.
    let radial = if style.flipped {
        layout.radius
    } else {
        -layout.radius
    };

    let mut utf8 = [0u8; 4];
    for ch in style.text.chars() {
        ctx.save();
        ctx.rotate(layout.char_angle / 2.0);
        ctx.translate(0.0, radial);
        if style.flipped {
            ctx.rotate(PI);
        }
        draw_char(ctx, style, ch.encode_utf8(&mut utf8), 0.0, 0.0);
        ctx.restore();
        ctx.rotate(layout.char_angle);
    }

    ctx.restore();
}

/// Paint `style` as a straight line, centered on the context origin.
///
/// Used for the zero-curvature case and while an edit session is active;
/// `width` and `height` are the flat text box.
pub(crate) fn render_flat(ctx: &mut dyn DrawContext, style: &ArcTextStyle, width: f32, height: f32) {
    log::debug!(
        target: "arctext",
        "render flat: {} chars in {}x{}",
        style.text.chars().count(),
        width,
        height
    );

    ctx.save();
    ctx.set_font(&style.font);
    ctx.set_text_align(TextAlign::Left);
    ctx.set_text_baseline(TextBaseline::Top);
    ctx.set_fill_color(style.fill);

    ctx.translate(-width / 2.0, -height / 2.0);

    let mut x = 0.0;
    let mut utf8 = [0u8; 4];
    for ch in style.text.chars() {
        let advance = ctx.char_width(ch);
        draw_char(ctx, style, ch.encode_utf8(&mut utf8), x, 0.0);
        x += advance + style.kerning;
    }

    ctx.restore();
}

/// Stroke (when enabled) then fill one character.
fn draw_char(ctx: &mut dyn DrawContext, style: &ArcTextStyle, ch: &str, x: f32, y: f32) {
    if let Some(stroke) = style.stroke {
        if style.stroke_width > 0.0 {
            ctx.set_stroke_color(stroke);
            ctx.set_line_width(style.stroke_width);
            ctx.stroke_text(ch, x, y);
        }
    }
    ctx.fill_text(ch, x, y);
}
