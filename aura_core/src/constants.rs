use std::time::Duration;

// Frame timing
pub const DEFAULT_FPS: u32 = 60;

// Spring integration
pub const SPRING_MAX_STEP_SECS: f32 = 0.001;
pub const SPRING_SETTLE_EPSILON: f32 = 0.01;

// Orb lifecycle timing (base values, scaled by the animation speed multiplier)
pub const ORB_INTRO: Duration = Duration::from_millis(2000);
pub const ORB_HANDOFF_DELAY: Duration = Duration::from_millis(100);
pub const ORB_DOCKED_DELAY: Duration = Duration::from_millis(1100);
pub const ORB_FALLBACK: Duration = Duration::from_millis(4000);

// Orb geometry
pub const INTRO_SCALE: f32 = 1.0;
pub const INTRO_OPACITY: f32 = 1.0;
pub const DOCKED_SCALE: f32 = 0.07; // 70px slot for a 1000px orb
pub const DOCKED_OPACITY: f32 = 1.0;
pub const DOCKED_Y_FRACTION: f32 = -0.35; // of viewport height, from center
pub const PARALLAX_RADIUS: f32 = 15.0;

// Dock sizing
pub const DOCK_BASE_SIZE: f32 = 40.0;
pub const DOCK_MAGNIFICATION: f32 = 56.0;
pub const DOCK_COLLAPSED_BASE_SIZE: f32 = 32.0;
pub const DOCK_COLLAPSED_MAGNIFICATION: f32 = 44.0;
pub const DOCK_DISTANCE: f32 = 60.0;
pub const DOCK_PANEL_WIDTH: f32 = 80.0;
pub const DOCK_COLLAPSED_PANEL_WIDTH: f32 = 20.0;
pub const DOCK_MIN_HOVER_WIDTH: f32 = 128.0;
pub const DOCK_LABEL_FADE: Duration = Duration::from_millis(200);

// Settings
pub const MIN_ANIMATION_SPEED: f32 = 0.05;
pub const MIN_ORB_OPACITY: f32 = 0.2;
pub const DEFAULT_ANIMATION_SPEED: f32 = 1.0;
pub const DEFAULT_VISUAL_INTENSITY: f32 = 0.7;
