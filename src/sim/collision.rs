//! Ball vs. wall collision
//!
//! Every wall is a thick axis-aligned segment with a rounded cap at each end.
//! For each wall, in list order, the ball's tentative position is classified
//! against three zones:
//!
//! - start cap (left end of a horizontal wall, top end of a vertical one)
//! - end cap (right / bottom)
//! - body (the straight span between the two cap points)
//!
//! Each zone is evaluated independently and sequentially, so a cap response
//! can be followed by a body response on the same wall, and later walls see
//! the adjustments made by earlier ones. Walls are never solved jointly.

use glam::Vec2;

use super::contact::resolve_cap_contact;
use super::level::Wall;
use super::state::Motion;
use crate::consts::BOUNCE_DAMPING;
use crate::distance;
use crate::settings::Settings;

/// Radii shared by every wall/ball pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactDims {
    pub half_wall: f32,
    pub ball_radius: f32,
}

impl ContactDims {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            half_wall: settings.half_wall(),
            ball_radius: settings.ball_radius,
        }
    }

    #[inline]
    pub fn contact_radius(&self) -> f32 {
        self.half_wall + self.ball_radius
    }
}

/// Which zones of a wall responded during one test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContacts {
    pub start_cap: bool,
    pub end_cap: bool,
    pub body: bool,
}

impl WallContacts {
    pub fn any(&self) -> bool {
        self.start_cap || self.end_cap || self.body
    }
}

/// Test one ball against one wall, rewriting `motion` in place on contact
pub fn collide_wall(motion: &mut Motion, wall: &Wall, dims: &ContactDims) -> WallContacts {
    // Horizontal walls run along x; vertical walls along y
    let (along, across) = if wall.horizontal { (0, 1) } else { (1, 0) };
    let r = dims.ball_radius;
    let hw = dims.half_wall;
    let reach = dims.contact_radius();
    let mut contacts = WallContacts::default();

    let line = wall.anchor[across];
    // Broad test: is the ball inside the wall's strip at all?
    if motion.next[across] + r < line - hw || motion.next[across] - r > line + hw {
        return contacts;
    }

    let start = wall.start();
    let end = wall.end();

    if motion.next[along] + r >= start[along] - hw
        && motion.next[along] < start[along]
        && distance(start, motion.next) < reach
    {
        *motion = resolve_cap_contact(start, motion, reach);
        contacts.start_cap = true;
    }

    if motion.next[along] - r <= end[along] + hw
        && motion.next[along] > end[along]
        && distance(end, motion.next) < reach
    {
        *motion = resolve_cap_contact(end, motion, reach);
        contacts.end_cap = true;
    }

    if motion.next[along] >= start[along] && motion.next[along] <= end[along] {
        motion.next[across] = if motion.next[across] < line {
            line - reach
        } else {
            line + reach
        };
        motion.pos[across] = motion.next[across];
        motion.vel[across] = -motion.vel[across] / BOUNCE_DAMPING;
        contacts.body = true;
    }

    contacts
}

/// Run one ball through every wall in order; returns the number of walls hit
pub fn collide_walls(motion: &mut Motion, walls: &[Wall], dims: &ContactDims) -> usize {
    let mut hits = 0;
    for (index, wall) in walls.iter().enumerate() {
        let contacts = collide_wall(motion, wall, dims);
        if contacts.any() {
            log::trace!(
                "wall {} contact {:?} -> pos={:?} vel={:?}",
                index,
                contacts,
                motion.pos,
                motion.vel
            );
            hits += 1;
        }
    }
    hits
}

/// Distance from `point` to a wall's centre segment
pub fn distance_to_wall(point: Vec2, wall: &Wall) -> f32 {
    let start = wall.start();
    let end = wall.end();
    let clamped = point.clamp(start.min(end), start.max(end));
    distance(point, clamped)
}
