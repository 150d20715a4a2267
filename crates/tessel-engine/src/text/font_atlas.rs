use std::collections::HashMap;
use std::fmt;

use crate::coords::Vec2;

use super::{FontGlyph, GlyphCorner, GlyphSource};

/// Error returned by [`FontdueAtlas::load`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Rasterization parameters for [`FontdueAtlas`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasConfig {
    /// Pixel size glyphs are rasterized at. Labels scale down from here.
    pub size_px: f32,
    /// Width and height of the square coverage bitmap.
    pub bitmap_size: u32,
    /// Empty pixels between packed glyphs.
    pub padding: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self { size_px: 32.0, bitmap_size: 512, padding: 1 }
    }
}

/// Shelf packer over a square bitmap.
#[derive(Debug, Clone)]
struct Shelf {
    size: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl Shelf {
    fn new(size: u32, padding: u32) -> Self {
        Self { size, padding, cursor_x: padding, cursor_y: padding, row_height: 0 }
    }

    /// Reserves a `w × h` cell and returns its top-left corner.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        // Advance to a new shelf row when the glyph doesn't fit horizontally.
        if self.cursor_x + w + self.padding > self.size {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }
        if self.cursor_x + w + self.padding > self.size || self.cursor_y + h + self.padding > self.size {
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

/// [`GlyphSource`] backed by a `fontdue` font.
///
/// A fixed character set is rasterized up front into a single-channel
/// coverage bitmap. Uploading that bitmap is up to the host; the glyph quads
/// already reference it through normalized texture coordinates.
pub struct FontdueAtlas {
    glyphs: HashMap<char, FontGlyph>,
    bitmap: Vec<u8>,
    config: AtlasConfig,
    line_height: f32,
}

impl FontdueAtlas {
    /// Parses a TrueType/OpenType font and rasterizes every char of `charset`.
    ///
    /// Characters the font does not cover, or that no longer fit in the
    /// bitmap, are left out and later skipped by layout.
    pub fn load(bytes: &[u8], charset: &str, config: AtlasConfig) -> Result<Self, FontLoadError> {
        let settings = fontdue::FontSettings { scale: config.size_px, ..fontdue::FontSettings::default() };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(|e| FontLoadError(e.to_string()))?;

        let line_height = font
            .horizontal_line_metrics(config.size_px)
            .map_or(config.size_px * 1.2, |m| m.new_line_size);

        let size = config.bitmap_size;
        let mut atlas = Self {
            glyphs: HashMap::new(),
            bitmap: vec![0; (size as usize) * (size as usize)],
            config,
            line_height,
        };
        let mut shelf = Shelf::new(size, config.padding);

        for c in charset.chars() {
            if c.is_control() || atlas.glyphs.contains_key(&c) {
                continue;
            }
            if font.lookup_glyph_index(c) == 0 {
                log::debug!("FontdueAtlas: font has no glyph for {c:?}");
                continue;
            }

            let (metrics, coverage) = font.rasterize(c, config.size_px);
            let (w, h) = (metrics.width as u32, metrics.height as u32);

            let quad = if w == 0 || h == 0 {
                [GlyphCorner::default(); 4]
            } else {
                let Some((x, y)) = shelf.place(w, h) else {
                    log::warn!("FontdueAtlas: bitmap is full ({size}×{size}); {c:?} and later glyphs dropped");
                    break;
                };
                atlas.blit(&coverage, x, y, w, h);
                atlas.glyph_quad(x, y, w, h, metrics.ymin as f32)
            };

            atlas.glyphs.insert(c, FontGlyph {
                left: metrics.xmin as f32,
                advance: metrics.advance_width,
                quad,
            });
        }

        log::debug!("FontdueAtlas: {} glyphs at {}px", atlas.glyphs.len(), config.size_px);
        Ok(atlas)
    }

    /// Coverage bitmap, `bitmap_size²` bytes, first row at `v = 0`.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    pub fn config(&self) -> AtlasConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    fn blit(&mut self, coverage: &[u8], x: u32, y: u32, w: u32, h: u32) {
        let stride = self.config.bitmap_size as usize;
        for (row, src) in coverage.chunks_exact(w as usize).take(h as usize).enumerate() {
            let start = (y as usize + row) * stride + x as usize;
            self.bitmap[start..start + src.len()].copy_from_slice(src);
        }
    }

    fn glyph_quad(&self, x: u32, y: u32, w: u32, h: u32, ymin: f32) -> [GlyphCorner; 4] {
        let size = self.config.bitmap_size as f32;
        let (u0, u1) = (x as f32 / size, (x + w) as f32 / size);
        let (v0, v1) = (y as f32 / size, (y + h) as f32 / size);
        let (right, top) = (w as f32, ymin + h as f32);

        [
            GlyphCorner { position: Vec2::new(right, top), texcoord: Vec2::new(u1, v0) },
            GlyphCorner { position: Vec2::new(0.0, top), texcoord: Vec2::new(u0, v0) },
            GlyphCorner { position: Vec2::new(right, ymin), texcoord: Vec2::new(u1, v1) },
            GlyphCorner { position: Vec2::new(0.0, ymin), texcoord: Vec2::new(u0, v1) },
        ]
    }
}

impl GlyphSource for FontdueAtlas {
    fn glyph(&self, c: char) -> Option<&FontGlyph> {
        self.glyphs.get(&c)
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

impl fmt::Debug for FontdueAtlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdueAtlas")
            .field("glyphs", &self.glyphs.len())
            .field("config", &self.config)
            .field("line_height", &self.line_height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bytes_that_are_not_a_font() {
        let err = FontdueAtlas::load(b"definitely not a font", "abc", AtlasConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("font load error"));
    }

    // ── shelf packing ─────────────────────────────────────────────────────

    #[test]
    fn shelf_places_left_to_right_then_wraps() {
        let mut shelf = Shelf::new(16, 1);
        assert_eq!(shelf.place(6, 4), Some((1, 1)));
        assert_eq!(shelf.place(6, 5), Some((8, 1)));
        // 15 + 6 + 1 > 16: next row starts below the tallest glyph.
        assert_eq!(shelf.place(6, 3), Some((1, 7)));
    }

    #[test]
    fn shelf_reports_full() {
        let mut shelf = Shelf::new(8, 1);
        assert_eq!(shelf.place(6, 6), Some((1, 1)));
        assert_eq!(shelf.place(6, 6), None);
        assert_eq!(shelf.place(20, 1), None);
    }
}
