//! Plane geometry shared by the gesture, motion and rendering layers.
//!
//! All distances are in reference units. The terminal front end maps cells
//! to reference units; the core never sees cells.

use serde::Serialize;
use std::ops::{Add, Mul, Sub};

/// A 2D vector: drag offsets, spring values and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// The rest position.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both components are within `epsilon` of `other`.
    pub fn approx_eq(&self, other: Vec2, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Viewport geometry, supplied once at layout time and on resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Half of the viewport width, the saturation point of every
    /// presentation curve.
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Horizontal distance a dismissed card travels to be fully off-screen.
    pub fn exit_distance(&self, margin: f64) -> f64 {
        self.width + margin
    }
}

impl Default for Viewport {
    /// A phone-sized portrait viewport.
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}
