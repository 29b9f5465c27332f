//! Frame-tick publisher.
//!
//! Components that animate subscribe once and are advanced on every frame.
//! The ticker holds weak references, so a dropped component detaches itself.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Something advanced once per rendered frame.
pub trait FrameListener {
    /// Advances timers and springs by `dt`.
    fn on_frame(&mut self, dt: Duration);

    /// True when another frame would change nothing.
    fn is_idle(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

#[derive(Default)]
pub struct FrameTicker {
    listeners: Vec<(TickId, Weak<RefCell<dyn FrameListener>>)>,
    next_id: u64,
    frames: u64,
}

impl FrameTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L: FrameListener + 'static>(&mut self, listener: &Rc<RefCell<L>>) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        let listener: Rc<RefCell<dyn FrameListener>> = listener.clone();
        self.listeners.push((id, Rc::downgrade(&listener)));
        id
    }

    /// Detaches a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: TickId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(tick_id, _)| *tick_id != id);
        self.listeners.len() != before
    }

    /// Advances every live listener by `dt`, in subscription order.
    ///
    /// Returns the number of listeners advanced. Readers must only sample
    /// listener state after this returns.
    pub fn tick(&mut self, dt: Duration) -> usize {
        self.frames += 1;
        self.listeners.retain(|(_, weak)| weak.strong_count() > 0);
        let mut advanced = 0;
        for (_, weak) in &self.listeners {
            if let Some(listener) = weak.upgrade() {
                listener.borrow_mut().on_frame(dt);
                advanced += 1;
            }
        }
        advanced
    }

    /// True when every live listener is idle, so the frame loop may sleep.
    pub fn is_idle(&self) -> bool {
        self.listeners
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .all(|listener| listener.borrow().is_idle())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
