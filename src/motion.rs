//! Motion engine: drives an animated 2D value toward a target over frames
//! of the host clock.
//!
//! Provides:
//! - The [`Motion`] trait the deck animates through
//! - A damped [`Spring`] with tension/friction configuration
//! - [`Snap`], which lands on its target in one frame (animations disabled)
//! - [`FrameClock`] for pacing the render loop

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Longest step a single `advance` call integrates. Keeps the card visibly
/// moving after a stalled frame instead of teleporting.
pub const MAX_STEP: Duration = Duration::from_millis(64);

/// An animated 2D value that reports when it has come to rest.
pub trait Motion: std::fmt::Debug {
    /// Advance by `dt` and return the new value.
    fn advance(&mut self, dt: Duration) -> Vec2;

    /// The current (possibly in-flight) value.
    fn value(&self) -> Vec2;

    /// The value the motion is heading to.
    fn target(&self) -> Vec2;

    /// Whether the motion has reached its target and stopped.
    fn is_settled(&self) -> bool;
}

/// Spring parameters in tension/friction form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Pull toward the target.
    pub tension: f64,
    /// Resistance to motion; lower is bouncier.
    pub friction: f64,
    /// Distance from the target considered at rest.
    #[serde(default = "default_rest_threshold")]
    pub rest_displacement: f64,
    /// Speed considered at rest.
    #[serde(default = "default_rest_threshold")]
    pub rest_speed: f64,
}

fn default_rest_threshold() -> f64 {
    0.001
}

impl SpringConfig {
    pub fn new(tension: f64, friction: f64) -> Self {
        Self {
            tension,
            friction,
            rest_displacement: default_rest_threshold(),
            rest_speed: default_rest_threshold(),
        }
    }

    /// Spring used to fling a card off-screen.
    pub fn dismiss() -> Self {
        Self::new(40.0, 7.0)
    }

    /// Softer, bouncier spring used to return a card to rest.
    pub fn cancel() -> Self {
        Self::new(40.0, 4.0)
    }

    /// Stiffness derived from tension.
    pub fn stiffness(&self) -> f64 {
        (self.tension - 30.0) * 3.62 + 194.0
    }

    /// Damping derived from friction.
    pub fn damping(&self) -> f64 {
        ((self.friction - 8.0) * 3.0 + 25.0).max(0.0)
    }

    /// Damping ratio; below 1 the spring overshoots.
    pub fn damping_ratio(&self) -> f64 {
        let stiffness = self.stiffness().max(f64::EPSILON);
        self.damping() / (2.0 * stiffness.sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::dismiss()
    }
}

/// Damped harmonic oscillator (unit mass) starting at rest, solved
/// analytically, so the result does not depend on frame rate.
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    from: Vec2,
    to: Vec2,
    elapsed: f64,
    value: Vec2,
    velocity: Vec2,
    settled: bool,
}

impl Spring {
    /// Start a spring at `from` heading to `to`, at rest initially.
    pub fn new(from: Vec2, to: Vec2, config: SpringConfig) -> Self {
        let settled = from.approx_eq(to, config.rest_displacement);
        Self {
            config,
            from,
            to,
            elapsed: 0.0,
            value: if settled { to } else { from },
            velocity: Vec2::ZERO,
            settled,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Position and velocity at time `t` seconds after start.
    fn solve(&self, t: f64) -> (Vec2, Vec2) {
        let k = self.config.stiffness().max(f64::EPSILON);
        let c = self.config.damping();
        let zeta = c / (2.0 * k.sqrt());
        let omega0 = k.sqrt();

        let x0 = self.to - self.from;
        // Released cards start from rest.
        let v0 = Vec2::ZERO;

        if zeta < 1.0 {
            let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega0 * t).exp();
            let (sin, cos) = (omega1 * t).sin_cos();
            let a = (v0 + x0 * (zeta * omega0)) * (1.0 / omega1);

            let position = self.to - (a * sin + x0 * cos) * envelope;
            let velocity = (a * sin + x0 * cos) * (zeta * omega0 * envelope)
                - ((v0 + x0 * (zeta * omega0)) * cos - x0 * (omega1 * sin)) * envelope;
            (position, velocity)
        } else {
            let envelope = (-omega0 * t).exp();
            let position = self.to - (x0 + (v0 + x0 * omega0) * t) * envelope;
            let velocity = (v0 * (t * omega0 - 1.0) + x0 * (t * omega0 * omega0)) * envelope;
            (position, velocity)
        }
    }
}

impl Motion for Spring {
    fn advance(&mut self, dt: Duration) -> Vec2 {
        if self.settled {
            return self.value;
        }

        self.elapsed += dt.min(MAX_STEP).as_secs_f64();
        let (position, velocity) = self.solve(self.elapsed);
        self.value = position;
        self.velocity = velocity;

        let at_rest = position.approx_eq(self.to, self.config.rest_displacement)
            && velocity.approx_eq(Vec2::ZERO, self.config.rest_speed);
        if at_rest {
            self.value = self.to;
            self.velocity = Vec2::ZERO;
            self.settled = true;
        }
        self.value
    }

    fn value(&self) -> Vec2 {
        self.value
    }

    fn target(&self) -> Vec2 {
        self.to
    }

    fn is_settled(&self) -> bool {
        self.settled
    }
}

/// Motion that lands on its target on the first frame.
#[derive(Debug, Clone)]
pub struct Snap {
    value: Vec2,
    to: Vec2,
    settled: bool,
}

impl Snap {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self {
            value: from,
            to,
            settled: false,
        }
    }
}

impl Motion for Snap {
    fn advance(&mut self, _dt: Duration) -> Vec2 {
        self.value = self.to;
        self.settled = true;
        self.value
    }

    fn value(&self) -> Vec2 {
        self.value
    }

    fn target(&self) -> Vec2 {
        self.to
    }

    fn is_settled(&self) -> bool {
        self.settled
    }
}

/// Paces the render loop and measures the time between frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Frames ticked so far
    pub frame: u64,
    /// Target FPS
    pub target_fps: u32,
    /// Frame duration
    pub frame_duration: Duration,
    /// Last tick time
    last_tick: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameClock {
    /// Create a clock for the given frame rate (at least 1 FPS).
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            frame: 0,
            target_fps,
            frame_duration: Duration::from_secs_f64(1.0 / target_fps as f64),
            last_tick: Instant::now(),
        }
    }

    /// Time left until the next frame is due.
    pub fn until_next_frame(&self) -> Duration {
        self.frame_duration
            .saturating_sub(self.last_tick.elapsed())
    }

    /// Whether a new frame is due.
    pub fn should_tick(&self) -> bool {
        self.last_tick.elapsed() >= self.frame_duration
    }

    /// Start a new frame, returning the time since the previous one.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.frame = self.frame.wrapping_add(1);
        dt
    }
}
