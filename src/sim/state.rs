//! Simulation entities
//!
//! Balls are the only mutable entities. Walls, hazards and the goal live on
//! the [`Maze`](super::level::Maze) and are read-only while a run is ticking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identity/colour tag of a ball, used only for goal evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallTag {
    Red,
    Green,
    Blue,
    Yellow,
}

impl BallTag {
    /// Spawn-order palette for balls without an explicit tag
    pub const CYCLE: [BallTag; 4] = [BallTag::Red, BallTag::Green, BallTag::Blue, BallTag::Yellow];

    pub fn for_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BallTag::Red => "red",
            BallTag::Green => "green",
            BallTag::Blue => "blue",
            BallTag::Yellow => "yellow",
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub tag: BallTag,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    /// A ball at rest
    pub fn new(tag: BallTag, pos: Vec2) -> Self {
        Self {
            tag,
            pos,
            vel: Vec2::ZERO,
        }
    }

    /// Start this ball's collision pass for the current tick
    pub fn begin_motion(&self) -> Motion {
        Motion {
            pos: self.pos,
            vel: self.vel,
            next: self.pos + self.vel,
        }
    }

    /// Integrate the post-collision velocity into the position
    pub fn commit(&mut self, motion: Motion) {
        self.vel = motion.vel;
        self.pos = motion.pos + motion.vel;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Per-tick working state of one ball.
///
/// `next` is the tentative position used for hit testing; it only exists
/// between [`Ball::begin_motion`] and [`Ball::commit`]. Contacts may rewrite
/// all three fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub pos: Vec2,
    pub vel: Vec2,
    pub next: Vec2,
}

/// A hazard hole. Always present; only live when `active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
    /// Set when a ball fell in during the current run (for highlighting)
    pub triggered: bool,
}

impl Hazard {
    pub fn new(pos: Vec2, radius: f32, active: bool) -> Self {
        Self {
            pos,
            radius,
            active,
            triggered: false,
        }
    }

    /// Whether a ball centred at `point` falls in
    pub fn captures(&self, point: Vec2) -> bool {
        self.active && crate::distance(self.pos, point) <= self.radius
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Level loaded, waiting for the first input
    Idle,
    /// Frames advance the simulation
    Running,
    /// Goal reached with the right set of balls
    Won,
    /// Stopped after an internal fault
    Halted,
}
