//! Time subsystem.
//!
//! Nothing in the engine reads a clock. Hosts own a [`FrameClock`] (or feed
//! fixed deltas) and hand `dt_ms` to sprite, batch and ticker updates.

mod frame_clock;
mod ticker;

pub use frame_clock::{FrameClock, FrameTime};
pub use ticker::Ticker;

/// Tick used to seed a transition started before its owner saw any frame.
pub const DEFAULT_TICK_MS: u32 = 16;
