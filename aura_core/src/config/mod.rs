//! Reactive settings: the persisted [`Config`], its partial updates and
//! the shared [`ConfigStore`] handle.

mod glass;
mod settings;
mod storage;
mod store;

pub use glass::GlassStyle;
pub use settings::{Config, ConfigPatch, FontFamily, FontSize, OrbKind, OrbPreset};
pub use storage::{ConfigStorage, JsonFileStorage, MemoryStorage};
pub use store::{ConfigStore, SubscriptionId};
