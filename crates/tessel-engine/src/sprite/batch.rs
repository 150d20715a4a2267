use std::ops::{Deref, DerefMut};

use crate::coords::ColorRgba;
use crate::render::{SpriteVertex, VertexSink};

use super::quad::{mirror_texcoords, paint_colors, paint_texcoords};
use super::{AtlasError, Quad, TextureRegions};

/// Handle to a sprite inside a [`SpriteBatch`].
///
/// Ids are positions: [`SpriteBatch::remove`] moves the last sprite into the
/// freed position, so that sprite takes over the removed id.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct QuadId(pub(crate) usize);

impl QuadId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

type RebindFn = Box<dyn FnMut(&[SpriteVertex])>;

/// Sprites sharing one contiguous vertex arena (four records per sprite).
///
/// Adding a sprite moves its records into the arena ("buffered" mode);
/// removing it hands them back. Either way the rebind callback sees the new
/// arena so the host can re-upload or re-point its GPU buffer.
#[derive(Default)]
pub struct SpriteBatch {
    quads: Vec<Quad>,
    windows: Vec<[SpriteVertex; 4]>,
    on_rebind: Option<RebindFn>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(sprites: usize) -> Self {
        Self {
            quads: Vec::with_capacity(sprites),
            windows: Vec::with_capacity(sprites),
            on_rebind: None,
        }
    }

    /// Installs the callback fired whenever the arena layout changes.
    pub fn on_rebind(&mut self, f: impl FnMut(&[SpriteVertex]) + 'static) {
        self.on_rebind = Some(Box::new(f));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Moves `quad` into the batch.
    pub fn add(&mut self, mut quad: Quad) -> QuadId {
        let slot = self.quads.len();
        let window = quad.bind_slot(slot);
        self.windows.push(window);
        self.quads.push(quad);
        log::debug!("SpriteBatch: bound sprite to slot {slot}");
        self.rebind();
        QuadId(slot)
    }

    /// Takes a sprite out of the batch, restoring its own vertex storage.
    pub fn remove(&mut self, id: QuadId) -> Option<Quad> {
        if id.0 >= self.quads.len() {
            return None;
        }

        let window = self.windows.swap_remove(id.0);
        let mut quad = self.quads.swap_remove(id.0);
        quad.unbind(window);

        if let Some(moved) = self.quads.get_mut(id.0) {
            moved.rebind_slot(id.0);
            log::debug!("SpriteBatch: slot {} now holds the former last sprite", id.0);
        }
        self.rebind();
        Some(quad)
    }

    pub fn get(&self, id: QuadId) -> Option<&Quad> {
        self.quads.get(id.0)
    }

    /// Mutable access to a sprite together with its arena window.
    pub fn sprite_mut(&mut self, id: QuadId) -> Option<SpriteMut<'_>> {
        let quad = self.quads.get_mut(id.0)?;
        let window = self.windows.get_mut(id.0)?;
        Some(SpriteMut { quad, window })
    }

    /// Records of one sprite.
    pub fn window(&self, id: QuadId) -> Option<&[SpriteVertex; 4]> {
        self.windows.get(id.0)
    }

    /// The whole arena, four records per sprite in id order.
    pub fn vertices(&self) -> &[SpriteVertex] {
        self.windows.as_flattened()
    }

    /// Updates every sprite exactly once.
    pub fn update(&mut self, dt_ms: u32) {
        for (quad, window) in self.quads.iter_mut().zip(self.windows.iter_mut()) {
            quad.update_into(dt_ms, window);
        }
    }

    pub fn upload(&self, sink: &mut dyn VertexSink) {
        sink.upload(self.vertices());
    }

    fn rebind(&mut self) {
        let Some(f) = self.on_rebind.as_mut() else { return; };
        f(self.windows.as_flattened());
    }
}

impl std::fmt::Debug for SpriteBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteBatch")
            .field("sprites", &self.quads.len())
            .field("has_rebind", &self.on_rebind.is_some())
            .finish()
    }
}

/// A buffered sprite borrowed from its batch.
///
/// Transform setters come through `Deref<Target = Quad>`; vertex attributes
/// are written straight into the batch arena.
pub struct SpriteMut<'a> {
    quad: &'a mut Quad,
    window: &'a mut [SpriteVertex; 4],
}

impl SpriteMut<'_> {
    pub fn vertices(&self) -> &[SpriteVertex; 4] {
        &*self.window
    }

    pub fn set_color(&mut self, c0: ColorRgba, c1: ColorRgba, c2: ColorRgba, c3: ColorRgba) {
        paint_colors(self.window, [c0, c1, c2, c3]);
    }

    pub fn set_color_all(&mut self, c: ColorRgba) {
        self.set_color(c, c, c, c);
    }

    pub fn set_texture(&mut self, atlas: &dyn TextureRegions, region: usize) -> Result<(), AtlasError> {
        let uv = atlas.texcoords(region).ok_or(AtlasError::UnknownRegion(region))?;
        paint_texcoords(self.window, uv);
        Ok(())
    }

    pub fn mirror(&mut self) {
        mirror_texcoords(self.window);
    }

    /// Updates this sprite alone, outside the batch-wide pass.
    pub fn update(&mut self, dt_ms: u32) {
        self.quad.update_into(dt_ms, self.window);
    }
}

impl Deref for SpriteMut<'_> {
    type Target = Quad;

    fn deref(&self) -> &Quad {
        &*self.quad
    }
}

impl DerefMut for SpriteMut<'_> {
    fn deref_mut(&mut self) -> &mut Quad {
        &mut *self.quad
    }
}
