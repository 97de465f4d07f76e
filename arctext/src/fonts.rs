//! Font loading, shaping attributes and per-character measurement.

use crate::font::FontSpec;
use cosmic_text::{Attrs, Buffer, CacheKeyFlags, Family, FontSystem, Metrics, Shaping, SwashCache};
use std::collections::HashSet;

/// Shared font engine: owns the cosmic-text font system and the swash glyph
/// cache.
///
/// Layout and measurement borrow it mutably, the same way cosmic-text threads
/// `&mut FontSystem` through its own API. One context is meant to be shared
/// by every curved-text object and canvas in a program.
pub struct FontContext {
    pub(crate) font_system: FontSystem,
    pub(crate) swash_cache: SwashCache,
}

impl FontContext {
    /// Create a context backed by the system font database.
    ///
    /// Generic CSS families (sans-serif, serif, monospace...) are mapped to
    /// the first available concrete family from the usual preference lists.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        apply_generic_families(&mut db);
        Self::with_db(db)
    }

    /// Create a context from a prepared font database.
    ///
    /// Useful for embedding fonts or for deterministic tests that must not
    /// depend on system fonts.
    pub fn with_db(db: fontdb::Database) -> Self {
        Self {
            font_system: FontSystem::new_with_locale_and_db("en".to_string(), db),
            swash_cache: SwashCache::new(),
        }
    }

    /// Measure the advance width of a single character, in pixels.
    ///
    /// Characters the font cannot shape (and anything measured against an
    /// empty database) report a width of zero.
    pub fn char_width(&mut self, font: &FontSpec, ch: char) -> f32 {
        // Shaping needs at least one loaded face.
        if self.font_system.db().faces().next().is_none() {
            return 0.0;
        }

        let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = font_attrs(font);
        let mut utf8 = [0u8; 4];
        buffer.set_text(
            &mut self.font_system,
            ch.encode_utf8(&mut utf8),
            &attrs,
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut width: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
        }
        width
    }
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Build cosmic-text shaping attributes for a font spec.
///
/// Hinting is disabled so glyph outlines stay resolution-independent under
/// the arc transforms.
pub(crate) fn font_attrs(font: &FontSpec) -> Attrs<'_> {
    let family = font
        .families
        .first()
        .map(|name| resolve_family(name))
        .unwrap_or(Family::SansSerif);
    Attrs::new()
        .family(family)
        .weight(font.weight)
        .style(font.style)
        .cache_key_flags(CacheKeyFlags::DISABLE_HINTING)
}

/// Map generic CSS family names onto cosmic-text's generic variants.
fn resolve_family(name: &str) -> Family<'_> {
    match name {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

/// Point generic families at the first available concrete family from each
/// priority list, matching browser behavior.
fn apply_generic_families(db: &mut fontdb::Database) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| {
            face.families
                .iter()
                .map(|(family, _lang)| family.clone())
                .collect::<Vec<_>>()
        })
        .collect();

    for family in ["Arial", "Helvetica", "Liberation Sans", "DejaVu Sans"] {
        if available.contains(family) {
            db.set_sans_serif_family(family);
            break;
        }
    }

    for family in [
        "Courier New",
        "Courier",
        "Liberation Mono",
        "DejaVu Sans Mono",
    ] {
        if available.contains(family) {
            db.set_monospace_family(family);
            break;
        }
    }

    for family in [
        "Times New Roman",
        "Times",
        "Liberation Serif",
        "DejaVu Serif",
    ] {
        if available.contains(family) {
            db.set_serif_family(family);
            break;
        }
    }
}
