//! Scalar tweening.
//!
//! A [`Transition`] drives one float from a start to a target value. Owners
//! keep them in `Option` slots: starting a new tween assigns a fresh value,
//! cancelling assigns `None`. There is no blending between tweens.

mod ease;
#[allow(clippy::module_inception)]
mod transition;

pub use ease::Ease;
pub use transition::{Step, Transition};
