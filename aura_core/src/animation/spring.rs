use crate::constants::{SPRING_MAX_STEP_SECS, SPRING_SETTLE_EPSILON};

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Smooth motion without bounce, for most elements.
    pub const DEFAULT: Self = Self::new(200.0, 22.0, 0.1);
    /// Large or heavy elements (panels, modals).
    pub const GENTLE: Self = Self::new(160.0, 24.0, 0.8);
    /// Small elements (icons, tooltips).
    pub const SNAPPY: Self = Self::new(300.0, 26.0, 0.05);
    pub const BOUNCY: Self = Self::new(400.0, 30.0, 0.1);
    /// Dock magnification.
    pub const DOCK: Self = Self::new(200.0, 20.0, 0.1);
    pub const SIDEBAR: Self = Self::new(220.0, 26.0, 0.8);
    /// Orb position/scale, critically damped.
    pub const ORB: Self = Self::new(100.0, 20.0, 1.0);

    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    fn is_valid(&self) -> bool {
        self.stiffness.is_finite()
            && self.damping.is_finite()
            && self.mass.is_finite()
            && self.stiffness > 0.0
            && self.damping > 0.0
            && self.mass > 0.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A spring-driven scalar moving toward `target`.
///
/// `current` and `velocity` only change through [`SpringField::tick`], except
/// for [`SpringField::teleport`] which is meant for initialization.
#[derive(Debug, Clone, Copy)]
pub struct SpringField {
    current: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping: f32,
    mass: f32,
}

impl Default for SpringField {
    fn default() -> Self {
        Self::new(SpringConfig::DEFAULT)
    }
}

impl SpringField {
    /// Creates a spring at rest at 0.0.
    pub fn new(config: SpringConfig) -> Self {
        debug_assert!(config.is_valid(), "invalid spring parameters: {config:?}");
        Self {
            current: 0.0,
            velocity: 0.0,
            target: 0.0,
            stiffness: config.stiffness,
            damping: config.damping,
            mass: config.mass,
        }
    }

    /// Creates a spring at rest at `value`.
    pub fn at(config: SpringConfig, value: f32) -> Self {
        let mut spring = Self::new(config);
        spring.teleport(value);
        spring.target = value;
        spring
    }

    /// Sets the target value for the spring to animate towards.
    pub fn retarget(&mut self, target: f32) {
        debug_assert!(target.is_finite(), "non-finite spring target");
        self.target = target;
    }

    /// Jumps to `value` with no motion. The target is left untouched.
    pub fn teleport(&mut self, value: f32) {
        debug_assert!(value.is_finite(), "non-finite spring value");
        self.current = value;
        self.velocity = 0.0;
    }

    /// Advances the spring by `dt` seconds.
    ///
    /// The interval is split into equal sub-steps no longer than
    /// [`SpringField::max_step`].
    pub fn tick(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0 && dt.is_finite(), "invalid spring dt: {dt}");
        if dt <= 0.0 {
            return;
        }
        let steps = (dt / self.max_step()).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            self.step(h);
        }
    }

    /// Longest stable integration step for this spring.
    ///
    /// Semi-implicit Euler stays stable while `h·ω ≤ 1` and `h·c/m ≤ 1`,
    /// with `ω = sqrt(k/m)`. Capped at `SPRING_MAX_STEP_SECS`.
    pub fn max_step(&self) -> f32 {
        let omega = (self.stiffness / self.mass).sqrt();
        let decay = self.damping / self.mass;
        SPRING_MAX_STEP_SECS.min(1.0 / omega).min(1.0 / decay)
    }

    fn step(&mut self, h: f32) {
        let force = self.stiffness * (self.target - self.current) - self.damping * self.velocity;
        let acceleration = force / self.mass;
        self.velocity += acceleration * h;
        self.current += self.velocity * h;
    }

    /// True when both the distance to target and the speed are below `epsilon`.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.target - self.current).abs() < epsilon && self.velocity.abs() < epsilon
    }

    /// [`SpringField::is_settled`] with the default tolerance.
    pub fn is_at_rest(&self) -> bool {
        self.is_settled(SPRING_SETTLE_EPSILON)
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}
