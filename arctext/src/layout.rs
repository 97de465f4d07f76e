//! Arc layout: turning text, metrics and curvature into placement angles.
//!
//! Everything here is pure arithmetic. Character advances come in through a
//! measuring closure so the engine works against any font backend (or a fixed
//! table in tests).

use crate::style::ArcTextStyle;
use std::f32::consts::PI;

/// Result of one layout pass over an [`ArcTextStyle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLayout {
    /// Sum of per-character advances plus kerning, in pixels.
    pub total_width: f32,
    /// Angle the whole text sweeps, in radians. Zero renders flat.
    pub angle_span: f32,
    /// Baseline radius of the arc, in pixels. Always positive.
    pub radius: f32,
    /// Angular step from one character to the next, in radians.
    pub char_angle: f32,
    /// Bounding-box width, rounded to whole pixels.
    pub width: f32,
    /// Bounding-box height, rounded to whole pixels.
    pub height: f32,
}

/// Compute the arc layout for `style`, measuring characters with `measure`.
///
/// `measure` returns the advance width of one character in pixels; the
/// kerning from `style` is added on top of every advance. The curved
/// bounding box is square with side `2 * (radius + font size)`; a zero span
/// gets the flat text box instead, and empty text collapses to zero.
pub fn compute_layout(style: &ArcTextStyle, mut measure: impl FnMut(char) -> f32) -> ArcLayout {
    let font_size = style.font.size_px;
    let char_count = style.text.chars().count();

    let mut total_width = 0.0;
    for ch in style.text.chars() {
        total_width += measure(ch) + style.kerning;
    }

    let angle_span = angle_span(style.diameter);
    let radius = arc_radius(total_width, angle_span, font_size);
    let char_angle = angle_span / char_count.max(1) as f32;

    let (width, height) = if char_count == 0 {
        (0.0, 0.0)
    } else if angle_span == 0.0 {
        flat_extent(total_width, font_size)
    } else {
        let side = (2.0 * (radius + font_size)).round();
        (side, side)
    };

    ArcLayout {
        total_width,
        angle_span,
        radius,
        char_angle,
        width,
        height,
    }
}

/// Angle span in radians for a curvature percentage.
///
/// The percentage is clamped to `[-100, 100]`, so a full circle is the most
/// the text can sweep in either direction.
pub(crate) fn angle_span(diameter: f32) -> f32 {
    diameter.clamp(-100.0, 100.0) / 100.0 * 2.0 * PI
}

/// Baseline radius for the given text width and span.
///
/// The quotient degenerates for a zero span or zero-width text; both fall
/// back to twice the font size so the radius stays positive.
fn arc_radius(total_width: f32, angle_span: f32, font_size: f32) -> f32 {
    let radius = (total_width / angle_span).abs();
    if radius.is_finite() && radius > 0.0 {
        radius
    } else {
        font_size * 2.0
    }
}

/// Flat text box: rounded total width by 1.2 em.
///
/// Negative kerning can push the width sum below zero; the box floors at
/// zero width.
pub(crate) fn flat_extent(total_width: f32, font_size: f32) -> (f32, f32) {
    (total_width.max(0.0).round(), (font_size * 1.2).round())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontSpec;

    fn style(text: &str, diameter: f32) -> ArcTextStyle {
        ArcTextStyle {
            text: text.to_string(),
            font: FontSpec::parse("20px sans-serif").unwrap(),
            diameter,
            ..ArcTextStyle::default()
        }
    }

    #[test]
    fn test_flat_layout() {
        let layout = compute_layout(&style("AB", 0.0), |_| 10.0);
        assert_eq!(layout.total_width, 20.0);
        assert_eq!(layout.angle_span, 0.0);
        assert_eq!(layout.char_angle, 0.0);
        assert_eq!(layout.width, 20.0);
        assert_eq!(layout.height, 24.0);
        // Radius falls back to twice the font size when the span is zero.
        assert_eq!(layout.radius, 40.0);
    }

    #[test]
    fn test_full_circle_layout() {
        let layout = compute_layout(&style("AB", 100.0), |_| 10.0);
        assert!((layout.angle_span - 2.0 * PI).abs() < 1e-6);
        assert!((layout.radius - 20.0 / (2.0 * PI)).abs() < 1e-6);
        assert!((layout.char_angle - PI).abs() < 1e-6);
        let side = (2.0 * (layout.radius + 20.0)).round();
        assert_eq!(layout.width, side);
        assert_eq!(layout.height, side);
    }

    #[test]
    fn test_half_circle_layout() {
        // 50 percent curvature sweeps half a circle.
        let layout = compute_layout(&style("AB", 50.0), |_| 10.0);
        assert_eq!(layout.total_width, 20.0);
        assert!((layout.angle_span - PI).abs() < 1e-6);
        assert!((layout.char_angle - PI / 2.0).abs() < 1e-6);
        assert!((layout.radius - 20.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_negative_diameter_mirrors_angles() {
        let pos = compute_layout(&style("abc", 60.0), |_| 8.0);
        let neg = compute_layout(&style("abc", -60.0), |_| 8.0);
        assert_eq!(neg.angle_span, -pos.angle_span);
        assert_eq!(neg.char_angle, -pos.char_angle);
        // Radius, and so the box, is direction-independent.
        assert_eq!(neg.radius, pos.radius);
        assert_eq!(neg.width, pos.width);
        assert_eq!(neg.height, pos.height);
    }

    #[test]
    fn test_flipped_box_matches_unflipped() {
        let mut mirrored_style = style("arc", 65.0);
        mirrored_style.flipped = true;

        let upright = compute_layout(&style("arc", 65.0), |_| 11.0);
        let mirrored = compute_layout(&mirrored_style, |_| 11.0);
        assert_eq!(mirrored.width, upright.width);
        assert_eq!(mirrored.height, upright.height);
        assert_eq!(mirrored.radius, upright.radius);
        assert_eq!(mirrored.angle_span, upright.angle_span);
    }

    #[test]
    fn test_diameter_clamped_to_full_circle() {
        let at_limit = compute_layout(&style("xy", 100.0), |_| 12.0);
        let beyond = compute_layout(&style("xy", 250.0), |_| 12.0);
        assert_eq!(beyond, at_limit);

        let at_neg_limit = compute_layout(&style("xy", -100.0), |_| 12.0);
        let below = compute_layout(&style("xy", -400.0), |_| 12.0);
        assert_eq!(below, at_neg_limit);
    }

    #[test]
    fn test_kerning_added_per_character() {
        let mut style = style("abcd", 0.0);
        style.kerning = 3.0;
        let layout = compute_layout(&style, |_| 5.0);
        assert_eq!(layout.total_width, 4.0 * (5.0 + 3.0));
    }

    #[test]
    fn test_negative_kerning_clamps_flat_width() {
        let mut style = style("ab", 0.0);
        style.kerning = -20.0;
        let layout = compute_layout(&style, |_| 10.0);
        // The raw sum stays negative for the radius math, the box does not.
        assert_eq!(layout.total_width, -20.0);
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 24.0);
    }

    #[test]
    fn test_empty_text_collapses() {
        let layout = compute_layout(&style("", 50.0), |_| 10.0);
        assert_eq!(layout.total_width, 0.0);
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 0.0);
        // The radius still has its fallback so downstream math stays finite.
        assert_eq!(layout.radius, 40.0);
        assert_eq!(layout.char_angle, layout.angle_span);
    }

    #[test]
    fn test_char_angles_sum_to_span() {
        let layout = compute_layout(&style("hello", 75.0), |_| 9.0);
        assert!((layout.char_angle * 5.0 - layout.angle_span).abs() < 1e-6);
    }

    #[test]
    fn test_multibyte_characters_counted_once() {
        let layout = compute_layout(&style("héllo", 50.0), |_| 10.0);
        assert!((layout.char_angle * 5.0 - layout.angle_span).abs() < 1e-6);
        assert_eq!(layout.total_width, 50.0);
    }

    #[test]
    fn test_zero_width_text_keeps_radius_fallback() {
        // Whitespace-only text can measure to zero width even on a curve.
        let layout = compute_layout(&style("   ", 80.0), |_| 0.0);
        assert_eq!(layout.total_width, 0.0);
        assert_eq!(layout.radius, 40.0);
        assert_eq!(layout.width, (2.0f32 * (40.0 + 20.0)).round());
    }
}
