//! Offscreen raster surface with a Canvas-2D-style state stack, and the
//! painter that draws text on it.

use crate::error::{ArcTextError, ArcTextResult};
use crate::font::FontSpec;
use crate::fonts::{font_attrs, FontContext};
use crate::render::DrawContext;
use crate::style::{CanvasColor, TextAlign, TextBaseline};
use crate::trim::TrimmedBitmap;
use cosmic_text::{Buffer, Command, Metrics, Shaping};
use tiny_skia::{Pixmap, Transform};

/// Maximum surface dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Drawing state saved and restored alongside the transform.
#[derive(Debug, Clone)]
struct SurfaceState {
    transform: Transform,
    font: FontSpec,
    text_align: TextAlign,
    text_baseline: TextBaseline,
    fill_color: CanvasColor,
    stroke_color: CanvasColor,
    line_width: f32,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            font: FontSpec::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            fill_color: CanvasColor::BLACK,
            stroke_color: CanvasColor::BLACK,
            line_width: 1.0,
        }
    }
}

/// A pixel surface with the subset of canvas state that text rendering
/// needs: transform stack, font, alignment and colors.
///
/// Drawing goes through [`PixmapPainter`], which pairs the surface with a
/// [`FontContext`] for the duration of a pass.
pub struct PixmapCanvas {
    width: u32,
    height: u32,
    pixmap: Pixmap,
    state: SurfaceState,
    state_stack: Vec<SurfaceState>,
}

impl PixmapCanvas {
    /// Create a transparent surface with the given dimensions.
    pub fn new(width: u32, height: u32) -> ArcTextResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ArcTextError::InvalidDimensions { width, height });
        }

        let pixmap =
            Pixmap::new(width, height).ok_or(ArcTextError::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            pixmap,
            state: SurfaceState::default(),
            state_stack: Vec::new(),
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get a reference to the underlying pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consume the surface, keeping only the pixel buffer.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Pair the surface with a font context for drawing.
    pub fn painter<'a>(&'a mut self, fonts: &'a mut FontContext) -> PixmapPainter<'a> {
        PixmapPainter {
            canvas: self,
            fonts,
        }
    }

    /// Export the surface as PNG data.
    ///
    /// `ppi` sets the pixel density metadata; `None` writes the 72 ppi
    /// default.
    pub fn to_png(&self, ppi: Option<f32>) -> ArcTextResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Set pixel density metadata (pixels per meter)
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;

            // Convert from premultiplied to straight alpha for PNG
            writer.write_image_data(&self.unpremultiplied_data())?;
        }
        Ok(buf)
    }

    /// Pixel data converted from premultiplied to straight alpha.
    fn unpremultiplied_data(&self) -> Vec<u8> {
        let src = self.pixmap.data();
        let mut data = vec![0u8; src.len()];
        for (dst, pixel) in data.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let a = pixel[3];
            if a == 0 {
                continue;
            }
            if a == 255 {
                dst.copy_from_slice(pixel);
            } else {
                let alpha = a as f32 / 255.0;
                dst[0] = (pixel[0] as f32 / alpha).min(255.0) as u8;
                dst[1] = (pixel[1] as f32 / alpha).min(255.0) as u8;
                dst[2] = (pixel[2] as f32 / alpha).min(255.0) as u8;
                dst[3] = a;
            }
        }
        data
    }
}

/// A [`PixmapCanvas`] bound to a [`FontContext`] for one drawing pass.
///
/// This is the crate's [`DrawContext`] implementation: transforms map to
/// tiny-skia, text renders as filled or stroked glyph outlines via
/// cosmic-text and swash.
pub struct PixmapPainter<'a> {
    canvas: &'a mut PixmapCanvas,
    fonts: &'a mut FontContext,
}

impl PixmapPainter<'_> {
    fn render_glyphs(&mut self, text: &str, x: f32, y: f32, fill: bool) {
        // Shaping needs at least one loaded face; without fonts the frame is
        // left untouched.
        if self.fonts.font_system.db().faces().next().is_none() {
            return;
        }

        let font = self.canvas.state.font.clone();
        let text_align = self.canvas.state.text_align;
        let text_baseline = self.canvas.state.text_baseline;
        let transform = self.canvas.state.transform;
        let line_width = self.canvas.state.line_width;
        let color = if fill {
            self.canvas.state.fill_color
        } else {
            self.canvas.state.stroke_color
        };

        let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.fonts.font_system, metrics);
        let attrs = font_attrs(&font);
        buffer.set_text(&mut self.fonts.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.fonts.font_system, false);

        let mut text_width: f32 = 0.0;
        for run in buffer.layout_runs() {
            text_width = text_width.max(run.line_w);
        }

        let base_x = x + align_offset(text_width, text_align);
        let base_y = y + baseline_offset(font.size_px, text_baseline);

        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            ..Default::default()
        };
        paint.set_color(color.into());

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                // The cache key comes from the physical glyph; the position is
                // kept in floating point for sub-pixel placement.
                let physical_glyph = glyph.physical((base_x, base_y), 1.0);
                let glyph_x = base_x + glyph.x + glyph.font_size * glyph.x_offset;
                let glyph_y = base_y + glyph.y - glyph.font_size * glyph.y_offset;

                let Some(commands) = self
                    .fonts
                    .swash_cache
                    .get_outline_commands(&mut self.fonts.font_system, physical_glyph.cache_key)
                else {
                    continue;
                };

                // Font outlines have Y pointing up, the surface has Y pointing
                // down, so Y is negated while building the path.
                let mut path_builder = tiny_skia::PathBuilder::new();
                for cmd in commands {
                    match cmd {
                        Command::MoveTo(p) => path_builder.move_to(p.x, -p.y),
                        Command::LineTo(p) => path_builder.line_to(p.x, -p.y),
                        Command::QuadTo(ctrl, end) => {
                            path_builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y)
                        }
                        Command::CurveTo(c1, c2, end) => {
                            path_builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                        }
                        Command::Close => path_builder.close(),
                    }
                }

                let Some(path) = path_builder.finish() else {
                    continue;
                };

                let glyph_transform =
                    Transform::from_translate(glyph_x, glyph_y).post_concat(transform);

                if fill {
                    self.canvas.pixmap.fill_path(
                        &path,
                        &paint,
                        tiny_skia::FillRule::Winding,
                        glyph_transform,
                        None,
                    );
                } else {
                    let stroke = tiny_skia::Stroke {
                        width: line_width,
                        ..Default::default()
                    };
                    self.canvas.pixmap.stroke_path(
                        &path,
                        &paint,
                        &stroke,
                        glyph_transform,
                        None,
                    );
                }
            }
        }
    }
}

impl DrawContext for PixmapPainter<'_> {
    fn save(&mut self) {
        self.canvas.state_stack.push(self.canvas.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.canvas.state_stack.pop() {
            self.canvas.state = state;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.canvas.state.transform = self.canvas.state.transform.pre_translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        let cos = radians.cos();
        let sin = radians.sin();
        let rotation = Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0);
        self.canvas.state.transform = self.canvas.state.transform.pre_concat(rotation);
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.canvas.state.font = font.clone();
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.canvas.state.text_align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.canvas.state.text_baseline = baseline;
    }

    fn set_fill_color(&mut self, color: CanvasColor) {
        self.canvas.state.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: CanvasColor) {
        self.canvas.state.stroke_color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        // Zero, negative and non-finite widths are ignored, like Canvas 2D.
        if width.is_finite() && width > 0.0 {
            self.canvas.state.line_width = width;
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "arctext", "fillText {:?} {} {}", text, x, y);
        self.render_glyphs(text, x, y, true);
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "arctext", "strokeText {:?} {} {}", text, x, y);
        self.render_glyphs(text, x, y, false);
    }

    fn draw_bitmap(&mut self, bitmap: &TrimmedBitmap, dx: f32, dy: f32) {
        log::debug!(
            target: "arctext",
            "drawBitmap {}x{} at {} {}",
            bitmap.width(),
            bitmap.height(),
            dx,
            dy
        );
        let paint = tiny_skia::PixmapPaint::default();
        let transform = self.canvas.state.transform.pre_translate(dx, dy);
        self.canvas
            .pixmap
            .draw_pixmap(0, 0, bitmap.pixmap.as_ref(), &paint, transform, None);
    }

    fn char_width(&mut self, ch: char) -> f32 {
        let font = self.canvas.state.font.clone();
        self.fonts.char_width(&font, ch)
    }
}

/// Horizontal offset from the anchor for a given alignment.
fn align_offset(text_width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Right => -text_width,
        TextAlign::Center => -text_width / 2.0,
    }
}

/// Vertical offset from the anchor to the alphabetic baseline.
///
/// Uses the usual 0.8/0.2 em split of ascent and descent.
fn baseline_offset(font_size: f32, baseline: TextBaseline) -> f32 {
    let ascent = font_size * 0.8;
    let descent = font_size * 0.2;
    match baseline {
        TextBaseline::Top => ascent,
        TextBaseline::Middle => ascent / 2.0 - descent / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Bottom => -descent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_fonts() -> FontContext {
        FontContext::with_db(fontdb::Database::new())
    }

    #[test]
    fn test_new_canvas() {
        let canvas = PixmapCanvas::new(120, 80).unwrap();
        assert_eq!(canvas.width(), 120);
        assert_eq!(canvas.height(), 80);
        // Fresh surfaces are fully transparent.
        assert!(canvas.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            PixmapCanvas::new(0, 10),
            Err(ArcTextError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            PixmapCanvas::new(10, 0),
            Err(ArcTextError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            PixmapCanvas::new(MAX_DIMENSION + 1, 10),
            Err(ArcTextError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_save_restore_state() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        let mut fonts = empty_fonts();
        let mut painter = canvas.painter(&mut fonts);

        painter.save();
        painter.translate(5.0, 7.0);
        painter.set_fill_color(CanvasColor::from_rgba8(1, 2, 3, 4));
        painter.restore();

        assert_eq!(canvas.state.transform, Transform::identity());
        assert_eq!(canvas.state.fill_color, CanvasColor::BLACK);
    }

    #[test]
    fn test_restore_on_empty_stack_is_a_no_op() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        let mut fonts = empty_fonts();
        let mut painter = canvas.painter(&mut fonts);

        painter.translate(3.0, 0.0);
        painter.restore();
        assert_eq!(canvas.state.transform, Transform::from_translate(3.0, 0.0));
    }

    #[test]
    fn test_rotate_then_translate_composes() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        let mut fonts = empty_fonts();
        let mut painter = canvas.painter(&mut fonts);

        painter.rotate(std::f32::consts::FRAC_PI_2);
        painter.translate(10.0, 0.0);

        // A quarter turn maps +x onto +y.
        let t = canvas.state.transform;
        let mut point = [tiny_skia::Point::from_xy(0.0, 0.0)];
        t.map_points(&mut point);
        assert!((point[0].x - 0.0).abs() < 1e-4);
        assert!((point[0].y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_line_width_guards() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        let mut fonts = empty_fonts();
        let mut painter = canvas.painter(&mut fonts);

        painter.set_line_width(4.0);
        painter.set_line_width(0.0);
        painter.set_line_width(-2.0);
        painter.set_line_width(f32::NAN);
        assert_eq!(canvas.state.line_width, 4.0);
    }

    #[test]
    fn test_fill_text_without_fonts_leaves_surface_clear() {
        let mut canvas = PixmapCanvas::new(50, 50).unwrap();
        let mut fonts = empty_fonts();
        let mut painter = canvas.painter(&mut fonts);

        painter.set_fill_color(CanvasColor::from_rgba8(255, 0, 0, 255));
        painter.fill_text("hi", 10.0, 25.0);

        assert!(canvas.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_draw_bitmap_blits_pixels() {
        let mut source = Pixmap::new(4, 4).unwrap();
        let red = tiny_skia::PremultipliedColorU8::from_rgba(255, 0, 0, 255).unwrap();
        for pixel in source.pixels_mut() {
            *pixel = red;
        }
        let bitmap = TrimmedBitmap {
            pixmap: source,
            offset_x: 0,
            offset_y: 0,
        };

        let mut canvas = PixmapCanvas::new(16, 16).unwrap();
        let mut fonts = empty_fonts();
        let mut painter = canvas.painter(&mut fonts);
        painter.translate(8.0, 8.0);
        painter.draw_bitmap(&bitmap, -2.0, -2.0);

        let pixels = canvas.pixmap().pixels();
        // Center of the blit is filled, far corner untouched.
        assert_eq!(pixels[(8 * 16 + 8) as usize].red(), 255);
        assert_eq!(pixels[0].alpha(), 0);
    }

    #[test]
    fn test_to_png_signature() {
        let canvas = PixmapCanvas::new(12, 9).unwrap();
        let png_data = canvas.to_png(None).unwrap();
        assert_eq!(&png_data[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_to_png_pixel_density() {
        let canvas = PixmapCanvas::new(4, 4).unwrap();
        let png_data = canvas.to_png(None).unwrap();

        let at = png_data
            .windows(4)
            .position(|w| w == b"pHYs")
            .expect("pHYs chunk missing");
        // The default 72 ppi is 2835 pixels per meter on both axes.
        let ppm = 2835u32.to_be_bytes();
        assert_eq!(&png_data[at + 4..at + 8], &ppm);
        assert_eq!(&png_data[at + 8..at + 12], &ppm);
        // Unit flag: meters.
        assert_eq!(png_data[at + 12], 1);
    }

    #[test]
    fn test_unpremultiplied_round_trip() {
        let mut canvas = PixmapCanvas::new(2, 1).unwrap();
        let half = tiny_skia::PremultipliedColorU8::from_rgba(64, 0, 0, 128).unwrap();
        canvas.pixmap.pixels_mut()[0] = half;

        let data = canvas.unpremultiplied_data();
        // 64/ (128/255) = 127.5, truncated.
        assert_eq!(data[3], 128);
        assert!((data[0] as i32 - 127).abs() <= 1);
        assert_eq!(&data[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_align_offsets() {
        assert_eq!(align_offset(30.0, TextAlign::Left), 0.0);
        assert_eq!(align_offset(30.0, TextAlign::Center), -15.0);
        assert_eq!(align_offset(30.0, TextAlign::Right), -30.0);
    }

    #[test]
    fn test_baseline_offsets() {
        assert_eq!(baseline_offset(10.0, TextBaseline::Alphabetic), 0.0);
        assert_eq!(baseline_offset(10.0, TextBaseline::Top), 8.0);
        assert_eq!(baseline_offset(10.0, TextBaseline::Bottom), -2.0);
        assert!((baseline_offset(10.0, TextBaseline::Middle) - 3.0).abs() < 1e-6);
    }
}
