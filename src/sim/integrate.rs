//! Velocity integration from tilt input
//!
//! Acceleration and friction arrive already scaled by the tick's time scale.
//! An axis with zero acceleration is flat: friction only bleeds speed off and
//! can never reverse it. On a tilted axis friction opposes the tilt.

use glam::Vec2;

use crate::input::TiltInput;
use crate::{clamp_abs, damp_toward_zero};

/// Advance one velocity component.
///
/// `clamp_before_friction` applies an extra speed clamp between the
/// acceleration and friction steps. The x axis uses it and the y axis does
/// not, so a saturated x velocity settles at `max - friction` while y stays
/// at `max`.
pub fn integrate_axis(
    velocity: f32,
    accel: f32,
    friction: f32,
    max_velocity: f32,
    clamp_before_friction: bool,
) -> f32 {
    if accel == 0.0 {
        return damp_toward_zero(velocity, friction);
    }

    let mut v = velocity + accel;
    if clamp_before_friction {
        v = clamp_abs(v, max_velocity);
    }
    v -= accel.signum() * friction;
    clamp_abs(v, max_velocity)
}

/// Advance a ball's velocity by one tick of (time-scaled) input
pub fn integrate_velocity(velocity: Vec2, input: &TiltInput, max_velocity: f32) -> Vec2 {
    Vec2::new(
        integrate_axis(velocity.x, input.accel.x, input.friction.x, max_velocity, true),
        integrate_axis(velocity.y, input.accel.y, input.friction.y, max_velocity, false),
    )
}
