//! Sprites: textured quads with incremental transform updates.
//!
//! Responsibilities:
//! - [`Transform`]: staleness tracking and the vertex solver
//! - [`Quad`]: the public sprite API, tweens, and vertex ownership
//! - [`SpriteBatch`]: a shared vertex arena for buffered sprites
//! - [`TextureAtlas`]: region-id to texture-coordinate lookup

mod atlas;
mod batch;
mod quad;
mod staleness;
mod transform;

pub use atlas::{AtlasError, TextureAtlas, TextureRegions};
pub use batch::{QuadId, SpriteBatch, SpriteMut};
pub use quad::Quad;
pub use staleness::Staleness;
pub use transform::{corner_origins, Transform, Trig};
