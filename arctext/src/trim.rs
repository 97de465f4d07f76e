//! Alpha-channel trim for offscreen rasters.

use tiny_skia::Pixmap;

/// A raster cropped to its non-transparent pixels.
///
/// `offset_x`/`offset_y` record where the cropped region sat inside the
/// original surface. Rendering centers the bitmap on the object's bounding
/// box and does not apply them; they are kept for callers that need to map
/// back to the untrimmed raster.
#[derive(Clone)]
pub struct TrimmedBitmap {
    pub pixmap: Pixmap,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl TrimmedBitmap {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Crop `pixmap` to the smallest rectangle containing every pixel with
/// alpha above zero.
///
/// A fully transparent surface (empty or whitespace-only text) comes back
/// unchanged with zero offsets.
pub fn trim_transparent(pixmap: Pixmap) -> TrimmedBitmap {
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let data = pixmap.data();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    let mut occupied = false;

    for y in 0..height {
        let row = &data[y * width * 4..(y + 1) * width * 4];
        for x in 0..width {
            if row[x * 4 + 3] > 0 {
                occupied = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if !occupied {
        log::debug!(target: "arctext", "trim: surface fully transparent, keeping {}x{}", width, height);
        return TrimmedBitmap {
            pixmap,
            offset_x: 0,
            offset_y: 0,
        };
    }

    let trimmed_w = max_x - min_x + 1;
    let trimmed_h = max_y - min_y + 1;
    let Some(mut trimmed) = Pixmap::new(trimmed_w as u32, trimmed_h as u32) else {
        return TrimmedBitmap {
            pixmap,
            offset_x: 0,
            offset_y: 0,
        };
    };

    log::debug!(
        target: "arctext",
        "trim: {}x{} -> {}x{} at ({}, {})",
        width, height, trimmed_w, trimmed_h, min_x, min_y
    );

    // Pixels stay premultiplied; a straight row copy is all that's needed.
    let src = pixmap.data();
    let dst = trimmed.data_mut();
    for row in 0..trimmed_h {
        let src_start = ((min_y + row) * width + min_x) * 4;
        let dst_start = row * trimmed_w * 4;
        let len = trimmed_w * 4;
        dst[dst_start..dst_start + len].copy_from_slice(&src[src_start..src_start + len]);
    }

    TrimmedBitmap {
        pixmap: trimmed,
        offset_x: min_x as u32,
        offset_y: min_y as u32,
    }
}
