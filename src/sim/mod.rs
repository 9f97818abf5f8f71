//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the per-tick time scale
//! - Walls are tested in level order, balls in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod contact;
pub mod integrate;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{ContactDims, WallContacts, collide_wall, collide_walls, distance_to_wall};
pub use contact::{clamp_to_cap_surface, resolve_cap_contact, roll_around_cap};
pub use integrate::{integrate_axis, integrate_velocity};
pub use level::{BallSpawn, Goal, GridCell, GridWall, LevelData, LevelSet, Maze, Wall};
pub use state::{Ball, BallTag, Hazard, Motion, RunPhase};
pub use tick::{FailReason, FrameReport, Outcome, Simulation};
