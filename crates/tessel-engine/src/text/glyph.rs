use crate::coords::Vec2;

/// One corner of a glyph quad, relative to the pen after the left bearing.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GlyphCorner {
    pub position: Vec2,
    pub texcoord: Vec2,
}

/// Metrics and quad of a rasterized glyph, in unscaled font units (pixels at
/// the atlas rasterization size).
///
/// `quad` uses sprite corner order: top-right, top-left, bottom-right,
/// bottom-left (Y-up).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FontGlyph {
    /// Left side bearing; the pen moves by this before the glyph is placed.
    pub left: f32,
    /// Full horizontal advance, bearing included.
    pub advance: f32,
    pub quad: [GlyphCorner; 4],
}

/// Glyph lookup used by text layout.
pub trait GlyphSource {
    /// Returns `None` when the font has no glyph for `c`.
    fn glyph(&self, c: char) -> Option<&FontGlyph>;

    /// Distance between baselines of consecutive lines.
    fn line_height(&self) -> f32;
}
