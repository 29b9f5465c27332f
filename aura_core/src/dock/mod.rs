//! Dock whose items magnify with pointer proximity.

mod magnify;
mod proximity;

pub use magnify::{interpolate, Axis, DockConfig};
pub use proximity::{DockFrame, DockItem, DockItemFrame, ProximityDock};
