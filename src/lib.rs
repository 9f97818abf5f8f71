//! Tilt Maze - steer balls through a wall maze by tilting the board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, wall contacts, outcomes)
//! - `input`: Pointer/device-tilt mapping to per-tick acceleration and friction
//! - `settings`: Dimensions, physics tuning and difficulty
//! - `error`: Crate error type

pub mod error;
pub mod input;
pub mod settings;
pub mod sim;

pub use error::{MazeError, Result};
pub use input::TiltInput;
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Width of a maze path between two walls
    pub const PATH_WIDTH: f32 = 25.0;
    /// Full wall thickness (walls extend half of this on each side)
    pub const WALL_THICKNESS: f32 = 10.0;
    /// Ball radius (the ball is 16 units across)
    pub const BALL_RADIUS: f32 = 8.0;
    /// Capture radius of a hazard hole
    pub const HAZARD_RADIUS: f32 = 9.0;

    /// Per-axis speed cap, in units per tick
    pub const MAX_VELOCITY: f32 = 1.5;
    /// Frame interval that maps to a time scale of exactly 1
    pub const FRAME_MS: f64 = 16.0;

    /// Tilt gravity
    pub const GRAVITY: f32 = 3.2;
    /// Rolling friction coefficient
    pub const FRICTION_COEFF: f32 = 0.008;

    /// Inelastic bounce damping for a wall body hit (`v = -v / 3`)
    pub const BOUNCE_DAMPING: f32 = 3.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}

/// Angle of the vector from `p1` to `p2`, in radians.
///
/// Two-quadrant `atan` with a π correction when the vector points left, so the
/// result lies in roughly `(-π/2, 3π/2)` rather than `atan2`'s `(-π, π]`.
/// A vertical vector divides by zero and saturates to ±π/2. Coincident points
/// have no direction and yield 0.
#[inline]
pub fn angle(p1: Vec2, p2: Vec2) -> f32 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let mut angle = (dy / dx).atan();
    if dx < 0.0 {
        angle += std::f32::consts::PI;
    }
    angle
}

/// Reduce the magnitude of `value` by `step` without crossing zero
#[inline]
pub fn damp_toward_zero(value: f32, step: f32) -> f32 {
    if value.abs() <= step {
        0.0
    } else if value > step {
        value - step
    } else {
        value + step
    }
}

/// Clamp `value` into `[-limit, limit]`
#[inline]
pub fn clamp_abs(value: f32, limit: f32) -> f32 {
    value.min(limit).max(-limit)
}

/// Unit vector pointing along `theta`
#[inline]
pub fn unit(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
