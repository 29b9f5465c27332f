use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{ORB_DOCKED_DELAY, ORB_FALLBACK, ORB_HANDOFF_DELAY, ORB_INTRO};

/// Lifecycle phase of the orb. Ordered; the controller only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbPhase {
    /// Full-screen centerpiece while the intro plays.
    Intro,
    /// Travelling to the docked slot.
    Handoff,
    /// Parked in its slot. Terminal.
    Docked,
}

impl fmt::Display for OrbPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrbPhase::Intro => "intro",
            OrbPhase::Handoff => "handoff",
            OrbPhase::Docked => "docked",
        };
        f.write_str(name)
    }
}

/// Base durations of the lifecycle timers.
///
/// Each is divided by the animation speed multiplier at the moment the
/// timer is armed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbTimings {
    /// Self-timed end of the intro. `None` leaves the intro to the host,
    /// with `fallback` as the safety net.
    pub intro: Option<Duration>,
    /// Pause between entering handoff and retargeting the springs.
    pub handoff_delay: Duration,
    /// Time from the retarget until the orb counts as docked.
    pub docked_delay: Duration,
    /// Forces the handoff if nothing else has.
    pub fallback: Duration,
}

impl Default for OrbTimings {
    fn default() -> Self {
        Self {
            intro: Some(ORB_INTRO),
            handoff_delay: ORB_HANDOFF_DELAY,
            docked_delay: ORB_DOCKED_DELAY,
            fallback: ORB_FALLBACK,
        }
    }
}

impl OrbTimings {
    /// Timings for a host that calls `complete_intro` itself.
    pub fn host_driven() -> Self {
        Self {
            intro: None,
            ..Self::default()
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.intro.map_or(true, |intro| self.fallback > intro)
    }
}

/// Render values of the orb for one frame.
///
/// `x` and `y` are offsets in pixels from the viewport center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbFrame {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub opacity: f32,
    pub phase: OrbPhase,
}
