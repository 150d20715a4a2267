//! Tessel engine crate.
//!
//! Incrementally updated 2D quads: sprites that only recompute the vertex
//! work their last change requires, eased transitions that drive them, and
//! glyph labels laid out from a font atlas.

pub mod coords;
pub mod logging;
pub mod render;
pub mod sprite;
pub mod text;
pub mod time;
pub mod transition;
