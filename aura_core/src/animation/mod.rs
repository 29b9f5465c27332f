mod frame;
mod spring;
mod timeline;

pub use frame::{FrameListener, FrameTicker, TickId};
pub use spring::{SpringConfig, SpringField};
pub use timeline::{Timeline, TimerId};
