use crate::coords::{approx_eq, ColorRgba, Vec2};
use crate::render::SpriteVertex;
use crate::time::DEFAULT_TICK_MS;
use crate::transition::{Ease, Transition};

use super::{AtlasError, Staleness, TextureRegions, Transform, Trig};

/// Where a sprite's four vertex records live.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum VertexStorage {
    /// The sprite owns its records.
    Owned([SpriteVertex; 4]),
    /// The records are window `slot` of a [`SpriteBatch`](super::SpriteBatch) arena.
    Buffered { slot: usize },
}

/// Running tweens, one slot per animatable property.
#[derive(Debug, Clone, Default, PartialEq)]
struct Tweens {
    x: Option<Transition>,
    y: Option<Transition>,
    angle: Option<Transition>,
}

/// Advances a slot and retires it once finished.
fn tick_slot(slot: &mut Option<Transition>, dt_ms: u32) -> Option<f32> {
    let step = slot.as_mut()?.update(dt_ms);
    if step.is_finished() {
        *slot = None;
    }
    Some(step.value())
}

/// A textured rectangle whose position, rotation, scale and pivot may change
/// every frame.
///
/// Setters never touch vertices. They record what went stale, and
/// [`update`](Self::update) advances running tweens and recomputes geometry
/// once:
///
/// ```ignore
/// let mut quad = Quad::new(32, 32);
/// quad.set_position(Vec2::new(100.0, 40.0));
/// quad.move_to(Vec2::new(300.0, 40.0), 500, Ease::OutQuad, Ease::Linear);
/// quad.update(frame.dt_ms);
/// ```
///
/// Cloning a buffered sprite yields an unbuffered copy with fresh records;
/// its geometry is rebuilt on the first update.
#[derive(Debug, PartialEq)]
pub struct Quad {
    width: u32,
    height: u32,
    transform: Transform,
    storage: VertexStorage,
    tweens: Tweens,
    last_dt_ms: u32,
}

impl Clone for Quad {
    fn clone(&self) -> Self {
        let mut transform = self.transform.clone();
        let storage = match &self.storage {
            VertexStorage::Owned(vx) => VertexStorage::Owned(*vx),
            VertexStorage::Buffered { .. } => {
                transform.mark_rebuild();
                VertexStorage::Owned([SpriteVertex::white(); 4])
            }
        };
        Self {
            width: self.width,
            height: self.height,
            transform,
            storage,
            tweens: self.tweens.clone(),
            last_dt_ms: self.last_dt_ms,
        }
    }
}

impl Quad {
    /// Creates an unbuffered sprite. The first update performs a full rebuild.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "Quad::new: empty footprint {width}x{height}");
        Self {
            width,
            height,
            transform: Transform::new(width, height),
            storage: VertexStorage::Owned([SpriteVertex::white(); 4]),
            tweens: Tweens::default(),
            last_dt_ms: DEFAULT_TICK_MS,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pivot(&self) -> Vec2 {
        self.transform.pivot()
    }

    /// Position the sprite will have after the next update.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position()
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.transform.scale()
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.transform.angle()
    }

    #[inline]
    pub fn staleness(&self) -> Staleness {
        self.transform.staleness()
    }

    /// Cached rotation, present only after a rebuild with a non-zero angle.
    #[inline]
    pub fn cached_trig(&self) -> Option<Trig> {
        self.transform.trig()
    }

    #[inline]
    pub fn is_buffered(&self) -> bool {
        matches!(self.storage, VertexStorage::Buffered { .. })
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.tweens.x.is_some() || self.tweens.y.is_some() || self.tweens.angle.is_some()
    }

    /// The sprite's own vertex records; `None` while buffered in a batch.
    pub fn vertices(&self) -> Option<&[SpriteVertex; 4]> {
        match &self.storage {
            VertexStorage::Owned(vx) => Some(vx),
            VertexStorage::Buffered { .. } => None,
        }
    }

    // ── transform setters ─────────────────────────────────────────────────

    /// Sets the normalized anchor used for rotation, scaling and placement.
    ///
    /// Components must lie in `[0, 1]`.
    pub fn set_pivot(&mut self, x: f32, y: f32) {
        let valid = (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y);
        debug_assert!(valid, "Quad::set_pivot: ({x}, {y}) outside [0, 1]");
        if !valid {
            log::warn!("Quad::set_pivot: ignoring invalid pivot ({x}, {y})");
            return;
        }
        self.transform.set_pivot(Vec2::new(x, y));
    }

    /// Uniform scale. `f` must be positive.
    pub fn set_scale(&mut self, f: f32) {
        self.set_scale_xy(f, f);
    }

    /// Per-axis scale. Both factors must be positive.
    pub fn set_scale_xy(&mut self, fx: f32, fy: f32) {
        let valid = fx > 0.0 && fy > 0.0;
        debug_assert!(valid, "Quad::set_scale: non-positive factor ({fx}, {fy})");
        if !valid {
            log::warn!("Quad::set_scale: ignoring non-positive factor ({fx}, {fy})");
            return;
        }
        self.transform.set_scale(Vec2::new(fx, fy));
    }

    /// Absolute rotation in radians. Cancels a running rotation tween.
    pub fn set_rotation(&mut self, r: f32) {
        if self.transform.set_angle(r) {
            self.tweens.angle = None;
        }
    }

    /// Relative rotation in radians. Cancels a running rotation tween.
    pub fn rotate_by(&mut self, r: f32) {
        if approx_eq(r, 0.0) {
            return;
        }
        self.tweens.angle = None;
        self.transform.set_angle(self.transform.angle() + r);
    }

    /// Absolute position. Cancels running position tweens.
    pub fn set_position(&mut self, p: Vec2) {
        if self.transform.set_position(p) {
            self.cancel_position_tweens();
        }
    }

    #[inline]
    pub fn set_position_xy(&mut self, x: f32, y: f32) {
        self.set_position(Vec2::new(x, y));
    }

    /// Translates by `delta` this frame. Cancels running position tweens.
    pub fn move_by(&mut self, delta: Vec2) {
        if self.transform.translate(delta) {
            self.cancel_position_tweens();
        }
    }

    fn cancel_position_tweens(&mut self) {
        self.tweens.x = None;
        self.tweens.y = None;
    }

    // ── animated setters ──────────────────────────────────────────────────

    /// Tweens the position to `target` over `duration_ms`.
    ///
    /// Replaces any running position tween. The new tweens are ticked once
    /// immediately (by the most recent frame delta) so the next frame already
    /// shows progress.
    pub fn move_to(&mut self, target: Vec2, duration_ms: u32, ease_x: Ease, ease_y: Ease) {
        let from = self.transform.position();
        self.tweens.x = Some(Transition::new(from.x, target.x, duration_ms, ease_x));
        self.tweens.y = Some(Transition::new(from.y, target.y, duration_ms, ease_y));

        let dt = self.last_dt_ms;
        if let Some(x) = tick_slot(&mut self.tweens.x, dt) {
            self.transform.set_position_x(x);
        }
        if let Some(y) = tick_slot(&mut self.tweens.y, dt) {
            self.transform.set_position_y(y);
        }
    }

    /// Tweens the rotation to `angle` (radians) over `duration_ms`.
    pub fn rotate_to(&mut self, angle: f32, duration_ms: u32, ease: Ease) {
        self.tweens.angle = Some(Transition::new(self.transform.angle(), angle, duration_ms, ease));
        if let Some(a) = tick_slot(&mut self.tweens.angle, self.last_dt_ms) {
            self.transform.write_angle(a);
        }
    }

    // ── vertex attributes ─────────────────────────────────────────────────

    /// Per-corner colors in corner order.
    pub fn set_color(&mut self, c0: ColorRgba, c1: ColorRgba, c2: ColorRgba, c3: ColorRgba) {
        if let Some(vx) = self.owned_vertices_mut("set_color") {
            paint_colors(vx, [c0, c1, c2, c3]);
        }
    }

    pub fn set_color_all(&mut self, c: ColorRgba) {
        self.set_color(c, c, c, c);
    }

    /// Copies the texture coordinates of `region` from `atlas`.
    pub fn set_texture(&mut self, atlas: &dyn TextureRegions, region: usize) -> Result<(), AtlasError> {
        let uv = atlas.texcoords(region).ok_or(AtlasError::UnknownRegion(region))?;
        if let Some(vx) = self.owned_vertices_mut("set_texture") {
            paint_texcoords(vx, uv);
        }
        Ok(())
    }

    /// Flips the texture horizontally.
    pub fn mirror(&mut self) {
        if let Some(vx) = self.owned_vertices_mut("mirror") {
            mirror_texcoords(vx);
        }
    }

    fn owned_vertices_mut(&mut self, op: &str) -> Option<&mut [SpriteVertex; 4]> {
        match &mut self.storage {
            VertexStorage::Owned(vx) => Some(vx),
            VertexStorage::Buffered { slot } => {
                log::warn!("Quad::{op}: sprite is buffered in slot {slot}; use SpriteBatch::sprite_mut");
                None
            }
        }
    }

    // ── update ────────────────────────────────────────────────────────────

    /// Advances tweens by `dt_ms` and brings the owned vertices up to date.
    ///
    /// Buffered sprites are updated by their batch; calling this on one is a
    /// no-op.
    pub fn update(&mut self, dt_ms: u32) {
        let VertexStorage::Owned(mut vx) = self.storage else {
            log::warn!("Quad::update: sprite is buffered; update the batch instead");
            return;
        };
        self.update_into(dt_ms, &mut vx);
        self.storage = VertexStorage::Owned(vx);
    }

    /// Update step shared with [`SpriteBatch`](super::SpriteBatch).
    pub(crate) fn update_into(&mut self, dt_ms: u32, vertices: &mut [SpriteVertex; 4]) {
        self.last_dt_ms = dt_ms;

        if let Some(x) = tick_slot(&mut self.tweens.x, dt_ms) {
            self.transform.set_position_x(x);
        }
        if let Some(y) = tick_slot(&mut self.tweens.y, dt_ms) {
            self.transform.set_position_y(y);
        }
        if let Some(a) = tick_slot(&mut self.tweens.angle, dt_ms) {
            self.transform.write_angle(a);
        }

        self.transform.solve(vertices);
    }

    // ── storage hand-off ──────────────────────────────────────────────────

    /// Moves the records out and marks the sprite as buffered in `slot`.
    pub(crate) fn bind_slot(&mut self, slot: usize) -> [SpriteVertex; 4] {
        match std::mem::replace(&mut self.storage, VertexStorage::Buffered { slot }) {
            VertexStorage::Owned(vx) => vx,
            VertexStorage::Buffered { slot: old } => {
                log::warn!("Quad: sprite already buffered in slot {old}; starting from fresh records");
                self.transform.mark_rebuild();
                [SpriteVertex::white(); 4]
            }
        }
    }

    pub(crate) fn rebind_slot(&mut self, slot: usize) {
        self.storage = VertexStorage::Buffered { slot };
    }

    pub(crate) fn unbind(&mut self, vertices: [SpriteVertex; 4]) {
        self.storage = VertexStorage::Owned(vertices);
    }
}

pub(crate) fn paint_colors(vx: &mut [SpriteVertex; 4], colors: [ColorRgba; 4]) {
    for (v, c) in vx.iter_mut().zip(colors) {
        v.color = c.to_array();
    }
}

pub(crate) fn paint_texcoords(vx: &mut [SpriteVertex; 4], uv: [Vec2; 4]) {
    for (v, t) in vx.iter_mut().zip(uv) {
        v.texcoord = t.into();
    }
}

pub(crate) fn mirror_texcoords(vx: &mut [SpriteVertex; 4]) {
    let [a, b, c, d] = vx.map(|v| v.texcoord);
    vx[0].texcoord = b;
    vx[1].texcoord = a;
    vx[2].texcoord = d;
    vx[3].texcoord = c;
}
