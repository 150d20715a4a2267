use std::rc::Rc;

use crate::coords::{approx_eq, ColorRgba, Vec2};
use crate::render::{SpriteVertex, VertexSink};
use crate::sprite::Trig;

use super::GlyphSource;

/// Horizontal alignment of each line relative to the label position.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TextAlignment {
    #[default]
    Left,
    Right,
    Center,
}

impl TextAlignment {
    /// Fraction of the line width shifted left of the anchor.
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            TextAlignment::Left => 0.0,
            TextAlignment::Right => 1.0,
            TextAlignment::Center => 0.5,
        }
    }
}

/// Pending work for the next [`Label::update`]. A layout also rewrites colors.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
enum LabelStale {
    Clean,
    Color,
    Layout,
}

/// A run of glyph quads laid out from UTF-8 text.
///
/// Glyphs are placed in local space relative to the start of their line. A
/// line's width is only known once the line ends, so alignment and rotation
/// are applied retroactively to that line's vertices.
pub struct Label {
    font: Rc<dyn GlyphSource>,
    text: Vec<u8>,
    color: ColorRgba,
    position: Vec2,
    scale: f32,
    angle: f32,
    alignment: TextAlignment,
    vertices: Vec<SpriteVertex>,
    width: f32,
    stale: LabelStale,
}

impl Label {
    pub fn new(font: Rc<dyn GlyphSource>) -> Self {
        Self {
            font,
            text: Vec::new(),
            color: ColorRgba::white(),
            position: Vec2::zero(),
            scale: 1.0,
            angle: 0.0,
            alignment: TextAlignment::Left,
            vertices: Vec::new(),
            width: 0.0,
            stale: LabelStale::Layout,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    #[inline]
    pub fn color(&self) -> ColorRgba {
        self.color
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Widest line of the last layout, in world units.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // ── setters ───────────────────────────────────────────────────────────

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
        self.mark(LabelStale::Layout);
    }

    /// Recolors on the next update without laying glyphs out again.
    pub fn set_color(&mut self, color: ColorRgba) {
        self.color = color;
        self.mark(LabelStale::Color);
    }

    pub fn set_font(&mut self, font: Rc<dyn GlyphSource>) {
        self.font = font;
        self.mark(LabelStale::Layout);
    }

    /// Anchor of the first line's baseline, snapped to whole units.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = Vec2::new((position.x + 0.5).floor(), (position.y + 0.5).floor());
        self.mark(LabelStale::Layout);
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
        self.mark(LabelStale::Layout);
    }

    pub fn set_rotation(&mut self, r: f32) {
        if approx_eq(r, self.angle) {
            return;
        }
        self.angle = r;
        self.mark(LabelStale::Layout);
    }

    /// Glyph scale relative to the font's rasterization size, clamped to
    /// `[0.01, 1]`.
    pub fn set_scale(&mut self, f: f32) {
        if approx_eq(f, self.scale) {
            return;
        }
        self.scale = f.clamp(0.01, 1.0);
        self.mark(LabelStale::Layout);
    }

    pub fn set_text(&mut self, text: &str) {
        self.set_text_bytes(text.as_bytes());
    }

    /// Raw text. Layout stops at the first malformed UTF-8 sequence.
    pub fn set_text_bytes(&mut self, text: &[u8]) {
        self.text.clear();
        self.text.extend_from_slice(text);
        self.mark(LabelStale::Layout);
    }

    fn mark(&mut self, stale: LabelStale) {
        self.stale = self.stale.max(stale);
    }

    // ── update ────────────────────────────────────────────────────────────

    /// Brings vertices up to date. Returns `true` if they changed.
    pub fn update(&mut self) -> bool {
        match self.stale {
            LabelStale::Clean => return false,
            LabelStale::Layout => self.layout(),
            LabelStale::Color => {
                let color = self.color.to_array();
                for v in &mut self.vertices {
                    v.color = color;
                }
            }
        }
        self.stale = LabelStale::Clean;
        true
    }

    pub fn upload(&self, sink: &mut dyn VertexSink) {
        sink.upload(&self.vertices);
    }

    fn layout(&mut self) {
        let font = Rc::clone(&self.font);
        let text = std::mem::take(&mut self.text);

        self.vertices.clear();
        self.width = 0.0;

        let trig = if approx_eq(self.angle, 0.0) {
            Trig { cos: 1.0, sin: 0.0 }
        } else {
            Trig::from_angle(self.angle)
        };
        let needs_alignment = self.alignment != TextAlignment::Left || trig.sin != 0.0;

        let scale = self.scale;
        let color = self.color.to_array();
        let mut pen = if needs_alignment { Vec2::zero() } else { self.position };
        let origin_x = pen.x;
        let mut line_start = 0;

        for c in decode_valid_prefix(&text).chars() {
            if c == '\n' {
                self.finish_line(line_start, pen.x - origin_x, trig, needs_alignment);
                pen.x = origin_x;
                pen.y -= font.line_height() * scale;
                line_start = self.vertices.len();
                continue;
            }

            let Some(glyph) = font.glyph(c) else { continue; };

            pen.x += glyph.left * scale;
            self.vertices.extend(glyph.quad.iter().map(|corner| SpriteVertex {
                position: (corner.position * scale + pen).into(),
                texcoord: corner.texcoord.into(),
                color,
            }));
            pen.x += (glyph.advance - glyph.left) * scale;
        }
        self.finish_line(line_start, pen.x - origin_x, trig, needs_alignment);

        self.text = text;
    }

    /// Aligns and rotates the vertices of the line starting at `start`.
    fn finish_line(&mut self, start: usize, width: f32, trig: Trig, needs_alignment: bool) {
        if needs_alignment {
            let offset = width * self.alignment.factor();
            let translate = self.position;
            for v in &mut self.vertices[start..] {
                let p = v.position();
                v.set_position(trig.rotate(Vec2::new(p.x - offset, p.y)) + translate);
            }
        }
        self.width = self.width.max(width);
    }
}

/// Longest valid UTF-8 prefix of `bytes`.
fn decode_valid_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Label: malformed UTF-8 at byte {}; layout stops there", e.valid_up_to());
            std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default()
        }
    }
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Label")
            .field("text", &String::from_utf8_lossy(&self.text))
            .field("position", &self.position)
            .field("alignment", &self.alignment)
            .field("width", &self.width)
            .field("vertices", &self.vertices.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;
    use crate::text::{FontGlyph, GlyphCorner};

    /// In-memory font: every glyph is a `w × h` box sitting on the baseline.
    struct FakeFont {
        glyphs: HashMap<char, FontGlyph>,
        lookups: Cell<usize>,
    }

    impl FakeFont {
        fn new() -> Rc<Self> {
            let mut glyphs = HashMap::new();
            glyphs.insert('a', glyph(1.0, 10.0, 8.0, 12.0));
            glyphs.insert('b', glyph(0.0, 6.0, 6.0, 10.0));
            glyphs.insert(' ', FontGlyph { left: 0.0, advance: 4.0, quad: [GlyphCorner::default(); 4] });
            Rc::new(Self { glyphs, lookups: Cell::new(0) })
        }
    }

    fn glyph(left: f32, advance: f32, w: f32, h: f32) -> FontGlyph {
        let corner = |x: f32, y: f32| GlyphCorner { position: Vec2::new(x, y), texcoord: Vec2::new(x / 64.0, y / 64.0) };
        FontGlyph {
            left,
            advance,
            quad: [corner(w, h), corner(0.0, h), corner(w, 0.0), corner(0.0, 0.0)],
        }
    }

    impl GlyphSource for FakeFont {
        fn glyph(&self, c: char) -> Option<&FontGlyph> {
            self.lookups.set(self.lookups.get() + 1);
            self.glyphs.get(&c)
        }

        fn line_height(&self) -> f32 {
            20.0
        }
    }

    fn label(text: &str, alignment: TextAlignment) -> Label {
        let mut l = Label::new(FakeFont::new());
        l.set_text(text);
        l.set_alignment(alignment);
        l.set_position(Vec2::new(100.0, 50.0));
        l.update();
        l
    }

    fn xs(l: &Label) -> Vec<f32> {
        l.vertices().iter().map(|v| v.position[0]).collect()
    }

    // ── pen advance ───────────────────────────────────────────────────────

    #[test]
    fn pen_applies_bearing_then_remaining_advance() {
        let l = label("ab", TextAlignment::Left);
        assert_eq!(l.vertex_count(), 8);
        // 'a': bearing 1 → x 101..109; 'b' starts at 100 + 10.
        assert_eq!(l.vertices()[1].position, [101.0, 50.0 + 12.0]);
        assert_eq!(l.vertices()[0].position, [109.0, 62.0]);
        assert_eq!(l.vertices()[5].position, [110.0, 60.0]);
        assert_eq!(l.width(), 16.0);
    }

    #[test]
    fn missing_glyph_is_skipped_without_advance() {
        let with_gap = label("a?b", TextAlignment::Left);
        let plain = label("ab", TextAlignment::Left);
        assert_eq!(with_gap.vertices(), plain.vertices());
        assert_eq!(with_gap.width(), plain.width());
    }

    #[test]
    fn scale_applies_to_quads_and_advance() {
        let mut l = Label::new(FakeFont::new());
        l.set_text("ab");
        l.set_scale(0.5);
        l.update();
        assert_eq!(l.width(), 8.0);
        assert_eq!(l.vertices()[0].position, [0.5 + 4.0, 6.0]);
    }

    // ── alignment ─────────────────────────────────────────────────────────

    #[test]
    fn alignment_offsets_by_fraction_of_line_width() {
        let left = xs(&label("ab a", TextAlignment::Left));
        let center = xs(&label("ab a", TextAlignment::Center));
        let right = xs(&label("ab a", TextAlignment::Right));
        let w = label("ab a", TextAlignment::Left).width();
        assert_eq!(w, 30.0);

        for i in 0..left.len() {
            assert_eq!(center[i], left[i] - w / 2.0);
            assert_eq!(right[i], left[i] - w);
        }
    }

    #[test]
    fn each_line_is_aligned_by_its_own_width() {
        let l = label("ab\na", TextAlignment::Right);
        assert_eq!(l.vertex_count(), 12);
        assert_eq!(l.width(), 16.0);
        // First line ends at the anchor: 'b' right edge = 100.
        assert_eq!(l.vertices()[4].position, [100.0, 60.0]);
        // Second line: width 10, one line height lower.
        assert_eq!(l.vertices()[8].position, [100.0 - 10.0 + 9.0, 50.0 - 20.0 + 12.0]);
    }

    #[test]
    fn newline_resets_pen_for_leading_alignment() {
        let l = label("b\nb", TextAlignment::Left);
        assert_eq!(l.vertices()[1].position, [100.0, 60.0]);
        assert_eq!(l.vertices()[5].position, [100.0, 40.0]);
    }

    #[test]
    fn rotation_turns_lines_about_the_anchor() {
        let mut l = Label::new(FakeFont::new());
        l.set_text("b");
        l.set_position(Vec2::new(10.0, 10.0));
        l.set_rotation(std::f32::consts::FRAC_PI_2);
        l.update();
        // Local (6, 10) rotates to (10, -6), then moves to the anchor.
        let p = l.vertices()[0].position;
        assert!((p[0] - 20.0).abs() < 1e-4 && (p[1] - 4.0).abs() < 1e-4, "{p:?}");
    }

    #[test]
    fn centered_lines_are_offset_before_rotation() {
        let mut l = Label::new(FakeFont::new());
        l.set_text("ab\na");
        l.set_alignment(TextAlignment::Center);
        l.set_position(Vec2::new(100.0, 50.0));
        l.set_rotation(std::f32::consts::FRAC_PI_2);
        l.update();
        assert_eq!(l.vertex_count(), 12);

        // A quarter turn maps local (x, y) to (y, -x) about the anchor.
        // Line one is 16 wide (offset 8), line two is 10 wide (offset 5).
        let expected = [
            (1, [112.0, 57.0]), // 'a' top-left: (1 - 8, 12)
            (4, [110.0, 42.0]), // 'b' top-right: (16 - 8, 10)
            (8, [92.0, 46.0]),  // second 'a' top-right: (9 - 5, -8)
        ];
        for (i, [x, y]) in expected {
            let p = l.vertices()[i].position;
            assert!((p[0] - x).abs() < 1e-4 && (p[1] - y).abs() < 1e-4, "vertex {i}: {p:?}");
        }
        assert_eq!(l.width(), 16.0);
    }

    // ── staleness ─────────────────────────────────────────────────────────

    #[test]
    fn color_update_skips_layout() {
        let font = FakeFont::new();
        let mut l = Label::new(font.clone());
        l.set_text("ab");
        l.update();
        let before = l.vertices().to_vec();
        let lookups = font.lookups.get();

        l.set_color(ColorRgba::new(9, 8, 7, 6));
        assert!(l.update());
        assert_eq!(font.lookups.get(), lookups);
        for (v, old) in l.vertices().iter().zip(&before) {
            assert_eq!(v.position, old.position);
            assert_eq!(v.color, [9, 8, 7, 6]);
        }
    }

    #[test]
    fn layout_after_color_uses_new_color() {
        let mut l = Label::new(FakeFont::new());
        l.set_color(ColorRgba::black());
        l.set_text("a");
        l.update();
        assert!(l.vertices().iter().all(|v| v.color == [0, 0, 0, 0xff]));
    }

    #[test]
    fn clean_label_does_not_update() {
        let mut l = label("a", TextAlignment::Left);
        assert!(!l.update());
        l.set_rotation(0.0);
        l.set_scale(1.0);
        assert!(!l.update());
    }

    // ── input handling ────────────────────────────────────────────────────

    #[test]
    fn malformed_utf8_stops_layout() {
        let mut l = Label::new(FakeFont::new());
        l.set_text_bytes(b"ab\xffa");
        l.update();
        assert_eq!(l.vertex_count(), 8);
    }

    #[test]
    fn position_snaps_and_scale_clamps() {
        let mut l = Label::new(FakeFont::new());
        l.set_position(Vec2::new(3.5, -2.4));
        assert_eq!(l.position(), Vec2::new(4.0, -2.0));
        l.set_scale(4.0);
        assert_eq!(l.scale(), 1.0);
        l.set_scale(0.0);
        assert_eq!(l.scale(), 0.01);
    }

    #[test]
    fn upload_hands_over_vertices() {
        let l = label("ab", TextAlignment::Center);
        let mut sink: Vec<SpriteVertex> = Vec::new();
        l.upload(&mut sink);
        assert_eq!(sink.as_slice(), l.vertices());
    }
}
