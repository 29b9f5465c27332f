//! The orb: a focal element that plays an intro, hands off, and parks in a
//! docked slot where it follows the pointer slightly.

mod controller;
mod phase;

pub use controller::{ListenerId, OrbController};
pub use phase::{OrbFrame, OrbPhase, OrbTimings};
