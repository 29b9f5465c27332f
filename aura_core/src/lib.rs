//! Animation orchestration core for the Aura assistant shell.
//!
//! A spring primitive, a three-phase orb lifecycle, a proximity-magnified
//! dock and a reactive settings store that scales every animation.

pub mod animation;
pub mod config;
pub mod constants;
pub mod debug;
pub mod dock;
pub mod error;
pub mod geometry;
pub mod orb;
pub mod session;

pub use animation::{FrameListener, FrameTicker, SpringConfig, SpringField, Timeline};
pub use config::{
    Config, ConfigPatch, ConfigStorage, ConfigStore, GlassStyle, JsonFileStorage, MemoryStorage,
};
pub use dock::{DockConfig, DockFrame, ProximityDock};
pub use error::{AuraError, AuraResult, ResultExt};
pub use geometry::{Point, Rect, Viewport};
pub use orb::{OrbController, OrbFrame, OrbPhase, OrbTimings};
pub use session::{RenderSurface, Session, SessionFrame, SessionOptions, ShellEvent};
