//! Text along a circular arc for Canvas-2D-style surfaces.
//!
//! This crate lays out single-line text on an arc and renders it without a
//! browser or JavaScript runtime. It uses:
//! - `tiny-skia` for 2D rasterization
//! - `cosmic-text` for text shaping, measurement and glyph outlines
//! - `fontdb` for font database management (can be shared with other crates)
//!
//! Curvature is a signed percentage of a full circle: `100` wraps the text
//! all the way around, `-100` wraps it the other way, `0` renders it flat.
//! Objects render either as vector glyphs drawn straight onto the target
//! ([`StrategyKind::Vector`]) or as a pre-rasterized, alpha-trimmed bitmap
//! ([`StrategyKind::Bitmap`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use arctext::{ArcText, ArcTextOptions, DrawContext, FontContext, PixmapCanvas};
//!
//! let mut fonts = FontContext::new();
//! let options = ArcTextOptions {
//!     font: "32px sans-serif".to_string(),
//!     diameter: 50.0,
//!     ..ArcTextOptions::default()
//! };
//! let mut text = ArcText::new("Curved!", options, &mut fonts)?;
//!
//! let mut canvas = PixmapCanvas::new(400, 400)?;
//! let mut painter = canvas.painter(&mut fonts);
//! painter.translate(200.0, 200.0);
//! text.render(&mut painter);
//! let png_data = canvas.to_png(None)?;
//! ```

mod canvas;
mod error;
mod font;
mod fonts;
mod layout;
mod object;
mod render;
mod strategy;
mod style;
mod trim;

// Re-export public API
pub use canvas::{PixmapCanvas, PixmapPainter};
pub use error::{ArcTextError, ArcTextResult};
pub use font::FontSpec;
pub use fonts::FontContext;
pub use layout::{compute_layout, ArcLayout};
pub use object::{ArcText, ArcTextOptions, ArcTextRecord};
pub use render::{render_text, DrawContext};
pub use strategy::{BitmapStrategy, Extent, LayoutStrategy, StrategyKind, VectorStrategy};
pub use style::{ArcTextStyle, CanvasColor, TextAlign, TextBaseline};
pub use trim::{trim_transparent, TrimmedBitmap};
