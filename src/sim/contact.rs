//! Contact resolution against wall caps
//!
//! A cap is the rounded end of a wall: a circle of radius `half_wall` around
//! the wall's end point. A ball may not come closer to the cap point than
//! `half_wall + ball_radius`. Instead of stopping dead on a cap, the ball is
//! first pushed back onto that circle and then rolled around it by the part
//! of its velocity that is tangential to the impact direction.

use glam::Vec2;

use super::state::Motion;
use crate::{angle, unit};

/// Closest legal ball centre to `ball`, on the line from `cap` through `ball`
pub fn clamp_to_cap_surface(cap: Vec2, ball: Vec2, contact_radius: f32) -> Vec2 {
    cap + unit(angle(cap, ball)) * contact_radius
}

/// Deflect a ball resting on the cap surface at `pos` and moving with `vel`.
///
/// The ball stays at `pos` for this tick; its velocity is replaced by the
/// displacement between `pos` and the point reached by rotating around the
/// cap through `atan(tangential_speed / contact_radius)`. A purely radial
/// approach has no tangential speed, so the ball comes to rest against the
/// cap; a grazing approach keeps nearly all of its speed.
pub fn roll_around_cap(cap: Vec2, pos: Vec2, vel: Vec2, contact_radius: f32) -> Motion {
    // Direction the wall holds the ball back from
    let impact_angle = angle(pos, cap);
    // Direction the ball wants to go
    let heading = angle(Vec2::ZERO, vel);
    let impact_heading_angle = impact_angle - heading;

    let tangential = impact_heading_angle.sin() * vel.length();
    let rotation_angle = (tangential / contact_radius).atan();

    let rolled = cap + unit(impact_angle + std::f32::consts::PI - rotation_angle) * contact_radius;
    let vel = pos - rolled;

    Motion {
        pos,
        vel,
        next: pos + vel,
    }
}

/// Full cap response: clamp the tentative position onto the cap surface,
/// then roll the ball from there
pub fn resolve_cap_contact(cap: Vec2, motion: &Motion, contact_radius: f32) -> Motion {
    let surface = clamp_to_cap_surface(cap, motion.next, contact_radius);
    roll_around_cap(cap, surface, motion.vel, contact_radius)
}
