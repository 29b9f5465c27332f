//! Session glue: one store handle, one orb, one dock, one frame ticker.
//!
//! The host feeds [`ShellEvent`]s and frame intervals in; a
//! [`SessionFrame`] comes out after every tick.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::animation::{FrameTicker, TickId};
use crate::config::{ConfigStore, GlassStyle};
use crate::dock::{DockConfig, DockFrame, ProximityDock};
use crate::geometry::{Point, Rect, Viewport};
use crate::orb::{ListenerId, OrbController, OrbFrame, OrbPhase, OrbTimings};

/// Input from the shell, in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellEvent {
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    ItemEnter(usize),
    ItemLeave(usize),
    ItemFocus(usize),
    ItemBlur(usize),
    ItemMeasured(usize, Option<Rect>),
    /// Screen rect of the whole dock panel.
    DockMeasured(Option<Rect>),
    ViewportResize { width: f32, height: f32 },
    CompleteIntro,
    SetCollapsed(bool),
}

/// Everything a render surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionFrame {
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub orb: OrbFrame,
    pub dock: DockFrame,
    pub glass: GlassStyle,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Consumer of session output.
pub trait RenderSurface {
    fn present(&mut self, frame: &SessionFrame);
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub viewport: Viewport,
    pub timings: OrbTimings,
    pub dock: DockConfig,
    pub items: Vec<String>,
    pub collapsed: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timings: OrbTimings::default(),
            dock: DockConfig::default(),
            items: ["chat", "history", "settings"]
                .into_iter()
                .map(String::from)
                .collect(),
            collapsed: false,
        }
    }
}

pub struct Session {
    store: ConfigStore,
    ticker: FrameTicker,
    orb: Rc<RefCell<OrbController>>,
    dock: Rc<RefCell<ProximityDock>>,
    subscriptions: Vec<TickId>,
    elapsed: Duration,
    torn_down: bool,
}

impl Session {
    pub fn new(store: ConfigStore, options: SessionOptions) -> Self {
        let orb = Rc::new(RefCell::new(OrbController::new(
            store.clone(),
            options.viewport,
            options.timings,
        )));
        let dock = Rc::new(RefCell::new(ProximityDock::new(
            options.dock,
            options.items,
            options.collapsed,
        )));

        let mut ticker = FrameTicker::new();
        let subscriptions = vec![ticker.subscribe(&orb), ticker.subscribe(&dock)];
        info!(
            width = options.viewport.width,
            height = options.viewport.height,
            items = dock.borrow().len(),
            "session started"
        );

        Self {
            store,
            ticker,
            orb,
            dock,
            subscriptions,
            elapsed: Duration::ZERO,
            torn_down: false,
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn orb(&self) -> Ref<'_, OrbController> {
        self.orb.borrow()
    }

    pub fn dock(&self) -> Ref<'_, ProximityDock> {
        self.dock.borrow()
    }

    pub fn phase(&self) -> OrbPhase {
        self.orb.borrow().phase()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn complete_intro(&mut self) {
        self.orb.borrow_mut().complete_intro();
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.dock.borrow_mut().set_collapsed(collapsed);
    }

    pub fn on_phase_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(OrbPhase, OrbPhase) + 'static,
    {
        self.orb.borrow_mut().on_phase_change(listener)
    }

    pub fn remove_phase_listener(&mut self, id: ListenerId) -> bool {
        self.orb.borrow_mut().remove_listener(id)
    }

    /// Routes one input event. Events update targets only.
    pub fn handle(&mut self, event: ShellEvent) {
        if self.torn_down {
            debug!(?event, "event after teardown ignored");
            return;
        }
        match event {
            ShellEvent::PointerMove { x, y } => {
                let pointer = Point::new(x, y);
                self.orb.borrow_mut().pointer_move(pointer);
                self.dock.borrow_mut().pointer_move(pointer);
            }
            ShellEvent::PointerLeave => self.dock.borrow_mut().pointer_leave(),
            ShellEvent::ItemEnter(i) => {
                self.dock.borrow_mut().item_enter(i);
            }
            ShellEvent::ItemLeave(i) => {
                self.dock.borrow_mut().item_leave(i);
            }
            ShellEvent::ItemFocus(i) => {
                self.dock.borrow_mut().item_focus(i);
            }
            ShellEvent::ItemBlur(i) => {
                self.dock.borrow_mut().item_blur(i);
            }
            ShellEvent::ItemMeasured(i, rect) => {
                self.dock.borrow_mut().measure(i, rect);
            }
            ShellEvent::DockMeasured(rect) => self.dock.borrow_mut().set_bounds(rect),
            ShellEvent::ViewportResize { width, height } => {
                self.orb.borrow_mut().resize(Viewport::new(width, height));
            }
            ShellEvent::CompleteIntro => self.complete_intro(),
            ShellEvent::SetCollapsed(collapsed) => self.set_collapsed(collapsed),
        }
    }

    /// Advances every animated component by `dt`, then samples them.
    pub fn tick(&mut self, dt: Duration) -> SessionFrame {
        if !self.torn_down {
            self.ticker.tick(dt);
            self.elapsed += dt;
        }
        self.frame()
    }

    /// Ticks and hands the resulting frame to `surface`.
    pub fn render(&mut self, dt: Duration, surface: &mut dyn RenderSurface) {
        let frame = self.tick(dt);
        surface.present(&frame);
    }

    pub fn frame(&self) -> SessionFrame {
        SessionFrame {
            elapsed: self.elapsed,
            orb: self.orb.borrow().frame(),
            dock: self.dock.borrow().frame(),
            glass: self.store.glass_style(),
        }
    }

    /// True when another tick would change nothing.
    pub fn is_idle(&self) -> bool {
        self.torn_down || self.ticker.is_idle()
    }

    pub fn frames(&self) -> u64 {
        self.ticker.frames()
    }

    /// Cancels timers, stops animation and detaches from the ticker.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.orb.borrow_mut().shutdown();
        self.dock.borrow_mut().shutdown();
        for id in self.subscriptions.drain(..) {
            self.ticker.unsubscribe(id);
        }
        self.torn_down = true;
        info!(elapsed_ms = self.elapsed.as_millis() as u64, "session torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigPatch;
    use crate::constants::{DOCK_BASE_SIZE, DOCK_MAGNIFICATION};

    const FRAME: Duration = Duration::from_millis(16);

    #[derive(Default)]
    struct Recorder {
        frames: Vec<SessionFrame>,
    }

    impl RenderSurface for Recorder {
        fn present(&mut self, frame: &SessionFrame) {
            self.frames.push(frame.clone());
        }
    }

    fn session() -> Session {
        Session::new(ConfigStore::in_memory(), SessionOptions::default())
    }

    #[test]
    fn render_presents_each_frame() {
        let mut session = session();
        let mut surface = Recorder::default();
        for _ in 0..3 {
            session.render(FRAME, &mut surface);
        }
        assert_eq!(surface.frames.len(), 3);
        assert_eq!(surface.frames[2].elapsed, FRAME * 3);
        assert_eq!(session.frames(), 3);
    }

    #[test]
    fn complete_intro_event_reaches_orb() {
        let mut session = session();
        session.handle(ShellEvent::CompleteIntro);
        assert_eq!(session.phase(), OrbPhase::Handoff);
    }

    #[test]
    fn pointer_events_reach_dock() {
        let mut session = session();
        session.handle(ShellEvent::ItemMeasured(0, Some(Rect::new(0.0, 0.0, 40.0, 40.0))));
        session.handle(ShellEvent::PointerMove { x: 20.0, y: 20.0 });
        assert_eq!(session.dock().items()[0].target_size(), DOCK_MAGNIFICATION);
        session.handle(ShellEvent::PointerLeave);
        assert_eq!(session.dock().items()[0].target_size(), DOCK_BASE_SIZE);
    }

    #[test]
    fn out_of_range_item_is_ignored() {
        let mut session = session();
        session.handle(ShellEvent::ItemEnter(42));
        session.handle(ShellEvent::ItemMeasured(42, None));
        assert!(session.frame().dock.items.iter().all(|i| !i.label_visible));
    }

    #[test]
    fn glass_follows_store() {
        let mut session = session();
        session.store().update(ConfigPatch::new().visual_intensity(0.0));
        assert_eq!(session.tick(FRAME).glass.blur_px, 0.0);
    }

    #[test]
    fn teardown_stops_everything() {
        let mut session = session();
        session.teardown();
        let before = session.frame();
        session.tick(Duration::from_secs(10));
        session.handle(ShellEvent::CompleteIntro);
        assert_eq!(session.frame(), before);
        assert_eq!(session.phase(), OrbPhase::Intro);
        assert!(session.is_idle());
    }

    #[test]
    fn shell_events_parse_from_json() {
        let event: ShellEvent = serde_json::from_str(r#"{"pointer_move":{"x":1.0,"y":2.0}}"#).unwrap();
        assert_eq!(event, ShellEvent::PointerMove { x: 1.0, y: 2.0 });
        let event: ShellEvent = serde_json::from_str(r#""complete_intro""#).unwrap();
        assert_eq!(event, ShellEvent::CompleteIntro);
    }
}
