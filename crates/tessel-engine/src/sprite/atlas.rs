use std::fmt;

use crate::coords::Vec2;

/// Error returned by texture region lookups and registration.
#[derive(Debug, Clone, PartialEq)]
pub enum AtlasError {
    /// No region is registered under this id.
    UnknownRegion(usize),
    /// The rectangle does not fit inside the atlas.
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::UnknownRegion(id) => write!(f, "atlas error: unknown texture region {id}"),
            AtlasError::OutOfBounds { x, y, width, height } => write!(
                f,
                "atlas error: region {width}x{height} at ({x}, {y}) exceeds atlas bounds"
            ),
        }
    }
}

impl std::error::Error for AtlasError {}

/// Texture-region lookup used by sprites.
///
/// Returns four texture coordinates in sprite corner order (top-right,
/// top-left, bottom-right, bottom-left).
pub trait TextureRegions {
    fn texcoords(&self, region: usize) -> Option<[Vec2; 4]>;
}

/// Regions of a single texture, addressed by the id returned from
/// [`add_region`](Self::add_region).
///
/// Pixel rectangles use the image's own top-left origin; texture space puts
/// the first image row at `v = 0`.
#[derive(Debug, Clone, Default)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    regions: Vec<[Vec2; 4]>,
}

impl TextureAtlas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, regions: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Registers a pixel rectangle and returns its region id.
    pub fn add_region(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<usize, AtlasError> {
        let fits = x.checked_add(width).is_some_and(|r| r <= self.width)
            && y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits || width == 0 || height == 0 {
            return Err(AtlasError::OutOfBounds { x, y, width, height });
        }

        let (tw, th) = (self.width as f32, self.height as f32);
        let u0 = x as f32 / tw;
        let u1 = (x + width) as f32 / tw;
        let v_top = y as f32 / th;
        let v_bottom = (y + height) as f32 / th;

        self.regions.push([
            Vec2::new(u1, v_top),
            Vec2::new(u0, v_top),
            Vec2::new(u1, v_bottom),
            Vec2::new(u0, v_bottom),
        ]);
        Ok(self.regions.len() - 1)
    }
}

impl TextureRegions for TextureAtlas {
    fn texcoords(&self, region: usize) -> Option<[Vec2; 4]> {
        self.regions.get(region).copied()
    }
}
