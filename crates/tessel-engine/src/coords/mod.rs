//! Coordinate and color types shared by sprites, labels and vertex records.
//!
//! World space:
//! - Y-up (a larger `y` is higher on screen)
//! - positions are absolute; corner offsets are relative to a pivot
//!
//! The backend maps world space to clip space; nothing here knows about it.

mod color;
mod vec2;

pub use color::ColorRgba;
pub use vec2::{approx_eq, Vec2};
