//! Orb lifecycle: Intro → Handoff → Docked.
//!
//! The controller owns four springs (x, y, scale, opacity) and a private
//! timeline. Events from the host only move spring targets or arm timers;
//! integration happens in [`FrameListener::on_frame`].

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use super::phase::{OrbFrame, OrbPhase, OrbTimings};
use crate::animation::{FrameListener, SpringConfig, SpringField, Timeline, TimerId};
use crate::config::ConfigStore;
use crate::constants::{
    DOCKED_OPACITY, DOCKED_SCALE, DOCKED_Y_FRACTION, INTRO_OPACITY, INTRO_SCALE, PARALLAX_RADIUS,
};
use crate::geometry::{Point, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type PhaseListener = Box<dyn FnMut(OrbPhase, OrbPhase)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrbTimer {
    IntroElapsed,
    Fallback,
    HandoffRetarget,
    DockedReached,
}

pub struct OrbController {
    store: ConfigStore,
    timings: OrbTimings,
    phase: OrbPhase,
    viewport: Viewport,
    x: SpringField,
    y: SpringField,
    scale: SpringField,
    opacity: SpringField,
    timeline: Timeline<OrbTimer>,
    intro_timer: Option<TimerId>,
    fallback_timer: Option<TimerId>,
    /// Set once the springs have been sent to the docked slot.
    retargeted: bool,
    parallax: Point,
    listeners: Vec<(ListenerId, PhaseListener)>,
    next_listener: u64,
    shut_down: bool,
}

impl fmt::Debug for OrbController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrbController")
            .field("phase", &self.phase)
            .field("viewport", &self.viewport)
            .field("frame", &self.frame())
            .field("pending_timers", &!self.timeline.is_idle())
            .field("listeners", &self.listeners.len())
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

impl OrbController {
    /// Creates the controller in `Intro` and arms the intro timers.
    pub fn new(store: ConfigStore, viewport: Viewport, timings: OrbTimings) -> Self {
        debug_assert!(timings.is_valid(), "fallback must outlast the intro: {timings:?}");
        let mut orb = Self {
            store,
            timings,
            phase: OrbPhase::Intro,
            viewport,
            x: SpringField::at(SpringConfig::ORB, 0.0),
            y: SpringField::at(SpringConfig::ORB, 0.0),
            scale: SpringField::at(SpringConfig::ORB, INTRO_SCALE),
            opacity: SpringField::at(SpringConfig::ORB, INTRO_OPACITY),
            timeline: Timeline::new(),
            intro_timer: None,
            fallback_timer: None,
            retargeted: false,
            parallax: Point::default(),
            listeners: Vec::new(),
            next_listener: 0,
            shut_down: false,
        };
        if let Some(intro) = timings.intro {
            let delay = orb.store.scaled(intro);
            orb.intro_timer = Some(orb.timeline.schedule(delay, OrbTimer::IntroElapsed));
        }
        let fallback = orb.store.scaled(timings.fallback);
        orb.fallback_timer = Some(orb.timeline.schedule(fallback, OrbTimer::Fallback));
        debug!(?viewport, fallback_ms = fallback.as_millis() as u64, "orb intro started");
        orb
    }

    pub fn phase(&self) -> OrbPhase {
        self.phase
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Time on the controller's own clock.
    pub fn elapsed(&self) -> Duration {
        self.timeline.now()
    }

    /// Ends the intro now. Calls after the first, or after a timer has
    /// already ended the intro, do nothing.
    pub fn complete_intro(&mut self) {
        if !self.begin_handoff("complete_intro") {
            debug!(phase = %self.phase, "complete_intro ignored");
        }
    }

    /// Records the new viewport. Once the orb has been sent to its slot the
    /// anchor is re-measured, keeping the parallax offset.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.retargeted {
            self.retarget_position();
        }
        debug!(width = viewport.width, height = viewport.height, "orb viewport resized");
    }

    /// Shifts the docked orb toward the pointer. Ignored before `Docked`.
    pub fn pointer_move(&mut self, pointer: Point) {
        if self.phase != OrbPhase::Docked || self.shut_down {
            return;
        }
        self.parallax = parallax_offset(self.viewport, pointer);
        self.retarget_position();
    }

    /// Registers a callback invoked with `(from, to)` on every transition.
    ///
    /// Callbacks run while the controller is borrowed and must not call back
    /// into it.
    pub fn on_phase_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(OrbPhase, OrbPhase) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn frame(&self) -> OrbFrame {
        OrbFrame {
            x: self.x.value(),
            y: self.y.value(),
            scale: self.scale.value(),
            opacity: self.opacity.value(),
            phase: self.phase,
        }
    }

    /// Target values the springs are moving toward.
    pub fn targets(&self) -> OrbFrame {
        OrbFrame {
            x: self.x.target(),
            y: self.y.target(),
            scale: self.scale.target(),
            opacity: self.opacity.target(),
            phase: self.phase,
        }
    }

    /// Cancels every pending timer and drops the phase listeners.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.timeline.cancel_all();
        self.intro_timer = None;
        self.fallback_timer = None;
        self.listeners.clear();
        self.shut_down = true;
        info!(phase = %self.phase, "orb controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// The single guarded way out of `Intro`.
    fn begin_handoff(&mut self, cause: &'static str) -> bool {
        if self.phase != OrbPhase::Intro || self.shut_down {
            return false;
        }
        for timer in [self.intro_timer.take(), self.fallback_timer.take()]
            .into_iter()
            .flatten()
        {
            self.timeline.cancel(timer);
        }
        info!(cause = cause, at_ms = self.timeline.now().as_millis() as u64, "orb handoff");
        self.transition(OrbPhase::Handoff);
        let delay = self.store.scaled(self.timings.handoff_delay);
        self.timeline.schedule(delay, OrbTimer::HandoffRetarget);
        true
    }

    fn retarget_to_slot(&mut self) {
        self.retargeted = true;
        self.retarget_position();
        self.scale.retarget(DOCKED_SCALE);
        self.opacity.retarget(DOCKED_OPACITY);
        let delay = self.store.scaled(self.timings.docked_delay);
        self.timeline.schedule(delay, OrbTimer::DockedReached);
        debug!(x = self.x.target(), y = self.y.target(), "orb retargeted to docked slot");
    }

    fn retarget_position(&mut self) {
        let anchor = docked_anchor(self.viewport);
        self.x.retarget(anchor.x + self.parallax.x);
        self.y.retarget(anchor.y + self.parallax.y);
    }

    fn transition(&mut self, to: OrbPhase) {
        let from = self.phase;
        debug_assert!(to > from, "orb phase moved backwards: {from} -> {to}");
        self.phase = to;
        debug!(%from, %to, "orb phase changed");
        for (_, listener) in self.listeners.iter_mut() {
            listener(from, to);
        }
    }

    fn handle(&mut self, timer: OrbTimer) {
        match timer {
            OrbTimer::IntroElapsed => {
                self.intro_timer = None;
                self.begin_handoff("intro_elapsed");
            }
            OrbTimer::Fallback => {
                self.fallback_timer = None;
                self.begin_handoff("fallback");
            }
            OrbTimer::HandoffRetarget => self.retarget_to_slot(),
            OrbTimer::DockedReached => {
                info!(at_ms = self.timeline.now().as_millis() as u64, "orb docked");
                self.transition(OrbPhase::Docked);
            }
        }
    }

    fn tick_springs(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        for spring in [&mut self.x, &mut self.y, &mut self.scale, &mut self.opacity] {
            spring.tick(secs);
        }
    }

    fn springs(&self) -> [&SpringField; 4] {
        [&self.x, &self.y, &self.scale, &self.opacity]
    }
}

impl FrameListener for OrbController {
    fn on_frame(&mut self, dt: Duration) {
        if self.shut_down {
            return;
        }
        let horizon = self.timeline.now() + dt;
        // Springs run up to each timer's instant before the timer retargets them.
        let mut integrated = self.timeline.now();
        while let Some(timer) = self.timeline.pop_due(horizon) {
            let fired_at = self.timeline.now();
            self.tick_springs(fired_at - integrated);
            integrated = fired_at;
            self.handle(timer);
        }
        self.timeline.settle_at(horizon);
        self.tick_springs(horizon - integrated);
    }

    fn is_idle(&self) -> bool {
        self.shut_down || (self.timeline.is_idle() && self.springs().iter().all(|s| s.is_at_rest()))
    }
}

impl Drop for OrbController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Docked slot relative to the viewport center.
fn docked_anchor(viewport: Viewport) -> Point {
    Point {
        x: 0.0,
        y: DOCKED_Y_FRACTION * viewport.height,
    }
}

/// Pointer-driven offset, at most `PARALLAX_RADIUS` long.
fn parallax_offset(viewport: Viewport, pointer: Point) -> Point {
    let n = viewport.normalize(pointer);
    let (mut dx, mut dy) = (n.x * PARALLAX_RADIUS, n.y * PARALLAX_RADIUS);
    let len = (dx * dx + dy * dy).sqrt();
    if len > PARALLAX_RADIUS {
        let k = PARALLAX_RADIUS / len;
        dx *= k;
        dy *= k;
    }
    Point { x: dx, y: dy }
}
