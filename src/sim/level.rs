//! Level layouts
//!
//! Levels are authored on a grid: walls run along grid lines, while balls and
//! holes sit in cell centres. [`Maze::build`] converts a [`LevelData`] into
//! space units using the current [`Settings`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, BallTag, Hazard};
use crate::error::{MazeError, Result};
use crate::settings::Settings;

/// Wall in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWall {
    pub column: i32,
    pub row: i32,
    pub horizontal: bool,
    pub length: i32,
}

const fn h(column: i32, row: i32, length: i32) -> GridWall {
    GridWall {
        column,
        row,
        horizontal: true,
        length,
    }
}

const fn v(column: i32, row: i32, length: i32) -> GridWall {
    GridWall {
        column,
        row,
        horizontal: false,
        length,
    }
}

/// Cell position in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub column: i32,
    pub row: i32,
}

/// Ball spawn; the tag defaults to the spawn-order palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallSpawn {
    pub column: i32,
    pub row: i32,
    #[serde(default)]
    pub tag: Option<BallTag>,
}

/// Goal region, already in space units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Goal {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        crate::distance(point, self.center()) < self.radius
    }
}

/// Static level descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub cols: u32,
    pub rows: u32,
    /// Tested in this order every tick; border walls come first
    pub walls: Vec<GridWall>,
    #[serde(default)]
    pub holes: Vec<GridCell>,
    pub balls: Vec<BallSpawn>,
    pub goal: Goal,
    pub required: Vec<BallTag>,
}

impl LevelData {
    /// The 10x9 reference maze
    pub fn level1() -> Self {
        let walls = vec![
            // Border
            h(0, 0, 10),
            v(0, 0, 9),
            h(0, 9, 10),
            v(10, 0, 9),
            // Horizontal
            h(0, 6, 1),
            h(0, 8, 1),
            h(1, 1, 2),
            h(1, 7, 1),
            h(2, 2, 2),
            h(2, 4, 1),
            h(2, 5, 1),
            h(2, 6, 1),
            h(3, 8, 3),
            h(4, 6, 1),
            h(5, 2, 2),
            h(5, 7, 1),
            h(6, 1, 1),
            h(6, 6, 2),
            h(7, 3, 2),
            h(7, 7, 2),
            h(8, 1, 1),
            h(8, 2, 1),
            h(8, 3, 1),
            h(8, 4, 2),
            h(8, 8, 2),
            // Vertical
            v(1, 1, 2),
            v(1, 4, 2),
            v(2, 2, 2),
            v(2, 5, 1),
            v(2, 7, 2),
            v(3, 0, 1),
            v(3, 3, 1),
            v(3, 6, 2),
            v(4, 1, 1),
            v(4, 6, 1),
            v(5, 0, 2),
            v(5, 6, 1),
            v(5, 8, 1),
            v(6, 6, 1),
            v(7, 1, 4),
            v(7, 7, 2),
            v(8, 2, 1),
            v(8, 4, 2),
            v(9, 1, 1),
            v(9, 5, 2),
        ];

        let holes = [(0, 5), (2, 0), (2, 3), (4, 6), (6, 2), (6, 8), (8, 1), (8, 2)]
            .into_iter()
            .map(|(column, row)| GridCell { column, row })
            .collect();

        let balls = [(0, 0), (9, 0), (0, 8), (9, 8)]
            .into_iter()
            .map(|(column, row)| BallSpawn {
                column,
                row,
                tag: None,
            })
            .collect();

        Self {
            cols: 10,
            rows: 9,
            walls,
            holes,
            balls,
            goal: Goal {
                x: 350.0 / 2.0,
                y: 315.0 / 2.0,
                radius: 30.0 / 2.0,
            },
            required: vec![BallTag::Green, BallTag::Blue, BallTag::Yellow],
        }
    }

    /// The first published layout of the 10x9 maze: one extra ledge at
    /// (3, 3), two posts moved or lengthened and one hole shifted down
    pub fn classic() -> Self {
        let walls = vec![
            // Border
            h(0, 0, 10),
            v(0, 0, 9),
            h(0, 9, 10),
            v(10, 0, 9),
            // Horizontal
            h(0, 6, 1),
            h(0, 8, 1),
            h(1, 1, 2),
            h(1, 7, 1),
            h(2, 2, 2),
            h(2, 4, 1),
            h(2, 5, 1),
            h(2, 6, 1),
            h(3, 3, 1),
            h(3, 8, 3),
            h(4, 6, 1),
            h(5, 2, 2),
            h(5, 7, 1),
            h(6, 1, 1),
            h(6, 6, 2),
            h(7, 3, 2),
            h(7, 7, 2),
            h(8, 1, 1),
            h(8, 2, 1),
            h(8, 3, 1),
            h(8, 4, 2),
            h(8, 8, 2),
            // Vertical
            v(1, 1, 2),
            v(1, 4, 2),
            v(2, 2, 2),
            v(2, 5, 1),
            v(2, 7, 2),
            v(3, 0, 1),
            v(3, 4, 1),
            v(3, 6, 2),
            v(4, 1, 2),
            v(4, 6, 1),
            v(5, 0, 2),
            v(5, 6, 1),
            v(5, 8, 1),
            v(6, 6, 1),
            v(7, 1, 4),
            v(7, 7, 2),
            v(8, 2, 1),
            v(8, 4, 2),
            v(9, 1, 1),
            v(9, 5, 2),
        ];

        let holes = [(0, 5), (2, 0), (2, 4), (4, 6), (6, 2), (6, 8), (8, 1), (8, 2)]
            .into_iter()
            .map(|(column, row)| GridCell { column, row })
            .collect();

        Self {
            walls,
            holes,
            ..Self::level1()
        }
    }

    /// Tag of every ball in spawn order, palette-assigned where not explicit
    pub fn spawn_tags(&self) -> impl Iterator<Item = BallTag> + '_ {
        self.balls
            .iter()
            .enumerate()
            .map(|(i, b)| b.tag.unwrap_or_else(|| BallTag::for_index(i)))
    }

    /// Reject layouts that cannot produce a meaningful run
    pub fn validate(&self, key: &str) -> Result<()> {
        let invalid = |reason: &str| MazeError::InvalidLevel {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        if self.balls.is_empty() {
            return Err(invalid("no balls"));
        }
        if self.walls.iter().any(|w| w.length < 0) {
            return Err(invalid("negative wall length"));
        }
        if !(self.goal.radius > 0.0) {
            return Err(invalid("goal radius must be positive"));
        }
        if self.required.is_empty() {
            return Err(invalid("empty required ball set"));
        }

        let (cols, rows) = (self.cols as i32, self.rows as i32);
        let on_grid = |w: &GridWall| {
            let (end_col, end_row) = if w.horizontal {
                (w.column + w.length, w.row)
            } else {
                (w.column, w.row + w.length)
            };
            w.column >= 0 && w.row >= 0 && end_col <= cols && end_row <= rows
        };
        if let Some(w) = self.walls.iter().find(|w| !on_grid(*w)) {
            return Err(invalid(&format!("wall {:?} leaves the {}x{} grid", w, cols, rows)));
        }

        let in_cell = |column: i32, row: i32| (0..cols).contains(&column) && (0..rows).contains(&row);
        if let Some(c) = self.holes.iter().find(|c| !in_cell(c.column, c.row)) {
            return Err(invalid(&format!("hole at ({}, {}) is off the grid", c.column, c.row)));
        }
        if let Some(b) = self.balls.iter().find(|b| !in_cell(b.column, b.row)) {
            return Err(invalid(&format!("ball at ({}, {}) is off the grid", b.column, b.row)));
        }

        let tags: BTreeSet<BallTag> = self.spawn_tags().collect();
        if let Some(missing) = self.required.iter().find(|t| !tags.contains(*t)) {
            return Err(invalid(&format!(
                "required {} ball is never spawned",
                missing.as_str()
            )));
        }
        Ok(())
    }
}

/// Keyed collection of levels: the built-ins plus any loaded from JSON
#[derive(Debug, Clone)]
pub struct LevelSet {
    levels: BTreeMap<String, LevelData>,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelSet {
    pub fn builtin() -> Self {
        let mut levels = BTreeMap::new();
        levels.insert("level1".to_string(), LevelData::level1());
        levels.insert("classic".to_string(), LevelData::classic());
        Self { levels }
    }

    /// Merge levels from a JSON object of `key -> LevelData`
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize> {
        let loaded: BTreeMap<String, LevelData> = serde_json::from_str(json)?;
        for (key, level) in &loaded {
            level.validate(key)?;
        }
        let count = loaded.len();
        self.levels.extend(loaded);
        Ok(count)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let count = self.extend_from_json(&json)?;
        log::info!("Loaded {} level(s) from {}", count, path.display());
        Ok(count)
    }

    pub fn insert(&mut self, key: impl Into<String>, level: LevelData) {
        self.levels.insert(key.into(), level);
    }

    pub fn get(&self, key: &str) -> Result<&LevelData> {
        self.levels
            .get(key)
            .ok_or_else(|| MazeError::UnknownLevel(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }
}

/// Axis-aligned wall in space units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Start point; horizontal walls extend right, vertical walls extend down
    pub anchor: Vec2,
    pub horizontal: bool,
    pub length: f32,
}

impl Wall {
    pub fn start(&self) -> Vec2 {
        self.anchor
    }

    pub fn end(&self) -> Vec2 {
        if self.horizontal {
            self.anchor + Vec2::new(self.length, 0.0)
        } else {
            self.anchor + Vec2::new(0.0, self.length)
        }
    }
}

/// A level converted to space units, ready to simulate
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    pub key: String,
    pub walls: Vec<Wall>,
    pub hazards: Vec<Hazard>,
    pub spawns: Vec<(BallTag, Vec2)>,
    pub goal: Goal,
    pub required: BTreeSet<BallTag>,
}

impl Maze {
    pub fn build(key: &str, data: &LevelData, settings: &Settings, hazards_active: bool) -> Result<Self> {
        data.validate(key)?;
        let cell = settings.cell();
        let centre = |column: i32, row: i32| {
            let offset = settings.half_wall() + settings.path_width / 2.0;
            Vec2::new(column as f32 * cell + offset, row as f32 * cell + offset)
        };

        let walls = data
            .walls
            .iter()
            .map(|w| Wall {
                anchor: Vec2::new(w.column as f32 * cell, w.row as f32 * cell),
                horizontal: w.horizontal,
                length: w.length as f32 * cell,
            })
            .collect();

        let hazards = data
            .holes
            .iter()
            .map(|c| Hazard::new(centre(c.column, c.row), settings.hazard_radius, hazards_active))
            .collect();

        let spawns = data
            .spawn_tags()
            .zip(&data.balls)
            .map(|(tag, b)| (tag, centre(b.column, b.row)))
            .collect();

        Ok(Self {
            key: key.to_string(),
            walls,
            hazards,
            spawns,
            goal: data.goal,
            required: data.required.iter().copied().collect(),
        })
    }

    /// Clear every hazard highlight and arm or disarm them all
    pub fn reset_hazards(&mut self, active: bool) {
        for hazard in &mut self.hazards {
            hazard.active = active;
            hazard.triggered = false;
        }
    }

    /// Fresh balls at their spawn points
    pub fn spawn_balls(&self) -> Vec<Ball> {
        self.spawns.iter().map(|&(tag, pos)| Ball::new(tag, pos)).collect()
    }
}
