//! Text: glyph sources and multi-glyph labels.
//!
//! Glyph metrics come from a [`GlyphSource`]; [`FontdueAtlas`] is the
//! bundled implementation. [`Label`] turns text into four vertex records per
//! drawable glyph.

mod font_atlas;
mod glyph;
mod label;

pub use font_atlas::{AtlasConfig, FontLoadError, FontdueAtlas};
pub use glyph::{FontGlyph, GlyphCorner, GlyphSource};
pub use label::{Label, TextAlignment};
