//! Game settings and tuning
//!
//! Loaded from a JSON file; any missing field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{MazeError, Result};

/// Difficulty mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Hazards are inert
    #[default]
    Easy,
    /// Hazards end the run on contact
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "hard" | "h" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Whether hazards are live in this mode
    pub fn hazards_active(&self) -> bool {
        *self == Difficulty::Hard
    }

    pub fn toggled(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Dimensions ===
    /// Width of a path between walls
    pub path_width: f32,
    /// Full wall thickness
    pub wall_thickness: f32,
    /// Ball radius
    pub ball_radius: f32,
    /// Hazard capture radius
    pub hazard_radius: f32,

    // === Physics ===
    /// Per-axis speed cap (units per tick)
    pub max_velocity: f32,
    /// Frame interval (ms) that corresponds to a time scale of 1
    pub frame_ms: f64,
    /// Tilt gravity
    pub gravity: f32,
    /// Friction coefficient
    pub friction_coeff: f32,

    // === Run ===
    pub difficulty: Difficulty,
    /// Level loaded at startup
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path_width: PATH_WIDTH,
            wall_thickness: WALL_THICKNESS,
            ball_radius: BALL_RADIUS,
            hazard_radius: HAZARD_RADIUS,

            max_velocity: MAX_VELOCITY,
            frame_ms: FRAME_MS,
            gravity: GRAVITY,
            friction_coeff: FRICTION_COEFF,

            difficulty: Difficulty::Easy,
            level: "level1".to_string(),
        }
    }
}

impl Settings {
    /// Size of one grid cell (path plus wall)
    #[inline]
    pub fn cell(&self) -> f32 {
        self.path_width + self.wall_thickness
    }

    #[inline]
    pub fn half_wall(&self) -> f32 {
        self.wall_thickness / 2.0
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("path_width", self.path_width, self.path_width > 0.0),
            ("wall_thickness", self.wall_thickness, self.wall_thickness >= 0.0),
            ("ball_radius", self.ball_radius, self.ball_radius > 0.0),
            ("hazard_radius", self.hazard_radius, self.hazard_radius >= 0.0),
            ("max_velocity", self.max_velocity, self.max_velocity > 0.0),
            ("frame_ms", self.frame_ms as f32, self.frame_ms > 0.0 && self.frame_ms.is_finite()),
            ("gravity", self.gravity, self.gravity.is_finite()),
            ("friction_coeff", self.friction_coeff, self.friction_coeff >= 0.0),
        ];
        for (name, value, ok) in checks {
            // Comparisons are false for NaN, so only infinities need a second look
            if !ok || value.is_infinite() {
                return Err(MazeError::InvalidSettings(format!("{name} = {value}")));
            }
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
