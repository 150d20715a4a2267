use crate::coords::{approx_eq, Vec2};
use crate::render::SpriteVertex;

use super::Staleness;

/// `(cos(-angle), sin(-angle))`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Trig {
    pub cos: f32,
    pub sin: f32,
}

impl Trig {
    pub fn from_angle(angle: f32) -> Self {
        Self {
            cos: (-angle).cos(),
            sin: (-angle).sin(),
        }
    }

    /// Applies the rotation to `v`.
    #[inline]
    pub fn rotate(self, v: Vec2) -> Vec2 {
        Vec2::new(self.cos * v.x - self.sin * v.y, self.sin * v.x + self.cos * v.y)
    }
}

/// Corner offsets of a `width × height` rectangle relative to `pivot`.
///
/// Order is top-right, top-left, bottom-right, bottom-left in Y-up space. The
/// backend's texture winding depends on this order.
pub fn corner_origins(width: f32, height: f32, pivot: Vec2) -> [Vec2; 4] {
    let o0 = Vec2::new(width * pivot.x, height * (1.0 - pivot.y));
    let o1 = o0 - Vec2::new(width, 0.0);
    let o2 = o0 - Vec2::new(0.0, height);
    let o3 = o1 - Vec2::new(0.0, height);
    [o0, o1, o2, o3]
}

/// Geometric state of one sprite plus the caches derived from it.
///
/// Every setter only records staleness. [`solve`](Self::solve) turns the
/// recorded staleness into vertex positions exactly once per frame.
///
/// Cache invariant: `origins` and `trig` are `None` whenever the properties
/// they derive from changed since the last solve, and any change that clears
/// one of them also marks [`Staleness::Rebuild`]. The translation shortcut is
/// only valid while both caches are current, so the two always travel
/// together through [`invalidate_origins`](Self::invalidate_origins) and
/// [`invalidate_trig`](Self::invalidate_trig).
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    width: f32,
    height: f32,
    pivot: Vec2,
    /// Requested absolute position of the pivot.
    position: Vec2,
    /// Position currently baked into the vertices.
    applied: Vec2,
    scale: Vec2,
    angle: f32,
    origins: Option<[Vec2; 4]>,
    trig: Option<Trig>,
    staleness: Staleness,
}

impl Transform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            pivot: Vec2::new(0.5, 0.5),
            position: Vec2::zero(),
            applied: Vec2::zero(),
            scale: Vec2::new(1.0, 1.0),
            angle: 0.0,
            origins: None,
            trig: None,
            staleness: Staleness::Rebuild,
        }
    }

    #[inline]
    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Position the sprite will have after the next solve.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Translation recorded but not yet applied to the vertices.
    #[inline]
    pub fn position_delta(&self) -> Vec2 {
        self.position - self.applied
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn origins(&self) -> Option<[Vec2; 4]> {
        self.origins
    }

    #[inline]
    pub fn trig(&self) -> Option<Trig> {
        self.trig
    }

    #[inline]
    pub fn staleness(&self) -> Staleness {
        self.staleness
    }

    /// Forces the next solve to rebuild every vertex position.
    pub(crate) fn mark_rebuild(&mut self) {
        self.staleness.mark_rebuild();
    }

    fn invalidate_origins(&mut self) {
        self.origins = None;
        self.staleness.mark_rebuild();
    }

    fn invalidate_trig(&mut self) {
        self.trig = None;
        self.staleness.mark_rebuild();
    }

    /// Returns `false` when `pivot` equals the current pivot.
    pub fn set_pivot(&mut self, pivot: Vec2) -> bool {
        if pivot.approx_eq(self.pivot) {
            return false;
        }
        self.pivot = pivot;
        self.invalidate_origins();
        true
    }

    /// Returns `false` when `scale` equals the current scale.
    pub fn set_scale(&mut self, scale: Vec2) -> bool {
        if scale.approx_eq(self.scale) {
            return false;
        }
        self.scale = scale;
        self.staleness.mark_rebuild();
        true
    }

    /// Returns `false` when `angle` equals the current angle.
    pub fn set_angle(&mut self, angle: f32) -> bool {
        if approx_eq(angle, self.angle) {
            return false;
        }
        self.angle = angle;
        self.invalidate_trig();
        true
    }

    /// Writes `angle` as given, without the tolerance check; used by tweens
    /// so a finished rotation lands on its literal target.
    pub fn write_angle(&mut self, angle: f32) {
        if angle.to_bits() == self.angle.to_bits() {
            return;
        }
        self.angle = angle;
        self.invalidate_trig();
    }

    /// Replaces any pending translation so the sprite lands on `position`.
    pub fn set_position(&mut self, position: Vec2) -> bool {
        if position.approx_eq(self.position) {
            return false;
        }
        self.position = position;
        self.staleness.mark_translate();
        true
    }

    /// Position on a single axis; used by per-axis tweens.
    pub fn set_position_x(&mut self, x: f32) {
        self.position.x = x;
        self.staleness.mark_translate();
    }

    pub fn set_position_y(&mut self, y: f32) {
        self.position.y = y;
        self.staleness.mark_translate();
    }

    /// Accumulates a translation on top of any pending one.
    pub fn translate(&mut self, delta: Vec2) -> bool {
        if delta.approx_eq(Vec2::zero()) {
            return false;
        }
        self.position += delta;
        self.staleness.mark_translate();
        true
    }

    /// Writes vertex positions for the recorded staleness and clears it.
    ///
    /// Texture coordinates and colors are left alone.
    pub fn solve(&mut self, vertices: &mut [SpriteVertex; 4]) {
        match self.staleness {
            Staleness::Clean => return,
            Staleness::Rebuild => self.rebuild(vertices),
            Staleness::Translate => {
                let delta = self.position - self.applied;
                for v in vertices.iter_mut() {
                    v.set_position(v.position() + delta);
                }
                self.applied = self.position;
            }
        }
        self.staleness.clear();
    }

    fn rebuild(&mut self, vertices: &mut [SpriteVertex; 4]) {
        let (width, height, pivot) = (self.width, self.height, self.pivot);
        let origins = *self
            .origins
            .get_or_insert_with(|| corner_origins(width, height, pivot));

        self.applied = self.position;

        let scale = self.scale;
        let position = self.position;

        if self.angle != 0.0 {
            let angle = self.angle;
            let trig = *self.trig.get_or_insert_with(|| Trig::from_angle(angle));
            for (v, o) in vertices.iter_mut().zip(origins) {
                v.set_position(trig.rotate(scale.mul_elem(o)) + position);
            }
        } else {
            for (v, o) in vertices.iter_mut().zip(origins) {
                v.set_position(scale.mul_elem(o) + position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(t: &mut Transform) -> [Vec2; 4] {
        let mut vx = [SpriteVertex::default(); 4];
        t.solve(&mut vx);
        vx.map(|v| v.position())
    }

    fn assert_close(a: [Vec2; 4], b: [Vec2; 4]) {
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p.x - q.x).abs() < 1e-4 && (p.y - q.y).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    // ── corner origins ────────────────────────────────────────────────────

    #[test]
    fn origins_centered_pivot() {
        let o = corner_origins(10.0, 20.0, Vec2::new(0.5, 0.5));
        assert_eq!(o[0], Vec2::new(5.0, 10.0));
        assert_eq!(o[1], Vec2::new(-5.0, 10.0));
        assert_eq!(o[2], Vec2::new(5.0, -10.0));
        assert_eq!(o[3], Vec2::new(-5.0, -10.0));
    }

    #[test]
    fn origins_bottom_left_pivot() {
        let o = corner_origins(4.0, 2.0, Vec2::new(0.0, 1.0));
        assert_eq!(o, [
            Vec2::new(0.0, 0.0),
            Vec2::new(-4.0, 0.0),
            Vec2::new(0.0, -2.0),
            Vec2::new(-4.0, -2.0),
        ]);
    }

    // ── solve ─────────────────────────────────────────────────────────────

    #[test]
    fn clean_solve_leaves_vertices_untouched() {
        let mut t = Transform::new(2, 2);
        let mut vx = [SpriteVertex::default(); 4];
        t.solve(&mut vx);
        let before = vx;
        t.solve(&mut vx);
        assert_eq!(vx, before);
    }

    #[test]
    fn scaled_and_moved_top_left_corner() {
        let mut t = Transform::new(10, 10);
        t.set_scale(Vec2::new(2.0, 2.0));
        t.set_position(Vec2::new(5.0, 5.0));
        let p = solved(&mut t);
        assert_eq!(p[1], Vec2::new(-5.0, 15.0));
        assert_eq!(t.staleness(), Staleness::Clean);
        assert!(t.position_delta().is_zero());
    }

    #[test]
    fn zero_angle_never_evaluates_trig() {
        let mut t = Transform::new(8, 8);
        t.set_scale(Vec2::new(3.0, 0.5));
        t.set_position(Vec2::new(-2.0, 9.0));
        solved(&mut t);
        assert_eq!(t.trig(), None);
    }

    #[test]
    fn quarter_turn_rotates_corners() {
        let mut t = Transform::new(2, 2);
        t.set_angle(std::f32::consts::FRAC_PI_2);
        let p = solved(&mut t);
        // cos(-pi/2) = 0, sin(-pi/2) = -1: (x, y) -> (y, -x).
        assert_close(p, [
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(-1.0, 1.0),
        ]);
        assert!(t.trig().is_some());
    }

    #[test]
    fn scale_is_applied_before_rotation() {
        let mut t = Transform::new(2, 2);
        t.set_scale(Vec2::new(3.0, 1.0));
        t.set_angle(std::f32::consts::FRAC_PI_2);
        let p = solved(&mut t);
        // Top-right origin (1, 1) scales to (3, 1), then rotates to (1, -3).
        assert_close([p[0]; 4], [Vec2::new(1.0, -3.0); 4]);
    }

    #[test]
    fn translation_shortcut_matches_full_rebuild() {
        let mut fast = Transform::new(6, 4);
        fast.set_scale(Vec2::new(1.5, 2.0));
        fast.set_angle(0.3);
        fast.set_pivot(Vec2::new(0.25, 0.75));
        let mut vx = [SpriteVertex::default(); 4];
        fast.solve(&mut vx);

        fast.set_position(Vec2::new(12.0, -7.0));
        assert_eq!(fast.staleness(), Staleness::Translate);
        fast.solve(&mut vx);

        let mut full = Transform::new(6, 4);
        full.set_scale(Vec2::new(1.5, 2.0));
        full.set_angle(0.3);
        full.set_pivot(Vec2::new(0.25, 0.75));
        full.set_position(Vec2::new(12.0, -7.0));
        assert_close(vx.map(|v| v.position()), solved(&mut full));
    }

    #[test]
    fn pending_translation_is_folded_into_rebuild() {
        let mut t = Transform::new(2, 2);
        solved(&mut t);
        t.translate(Vec2::new(4.0, 0.0));
        t.set_scale(Vec2::new(2.0, 2.0));
        assert_eq!(t.staleness(), Staleness::Rebuild);
        let p = solved(&mut t);
        assert_eq!(p[0], Vec2::new(6.0, 2.0));
        assert_eq!(t.position(), Vec2::new(4.0, 0.0));
    }

    // ── redundant writes ──────────────────────────────────────────────────

    #[test]
    fn redundant_setters_keep_transform_clean() {
        let mut t = Transform::new(3, 3);
        solved(&mut t);
        assert!(!t.set_pivot(Vec2::new(0.5, 0.5)));
        assert!(!t.set_scale(Vec2::new(1.0, 1.0)));
        assert!(!t.set_angle(0.0));
        assert!(!t.set_position(Vec2::zero()));
        assert!(!t.translate(Vec2::zero()));
        assert!(t.staleness().is_clean());
    }

    #[test]
    fn pivot_change_drops_cached_origins() {
        let mut t = Transform::new(3, 3);
        solved(&mut t);
        assert!(t.origins().is_some());
        t.set_pivot(Vec2::new(0.0, 0.0));
        assert_eq!(t.origins(), None);
        assert_eq!(t.staleness(), Staleness::Rebuild);
    }
}
