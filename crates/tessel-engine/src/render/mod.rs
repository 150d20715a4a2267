//! Vertex records and their hand-off to the backend.
//!
//! Sprites and labels write [`SpriteVertex`] records; hosts move them to the
//! GPU through a [`VertexSink`]. Draw calls, pipelines and ordering belong to
//! the host.

mod ctx;
mod upload;
mod vertex;

pub use ctx::RenderCtx;
pub use upload::{GpuVertexBuffer, VertexSink};
pub use vertex::SpriteVertex;
