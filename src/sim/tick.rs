//! Fixed-step simulation loop
//!
//! The host delivers frames with a timestamp; each frame advances every ball
//! once. Elapsed time is normalised so that one frame interval (16 ms by
//! default) is a time scale of 1. The first frame after a (re)start only
//! records the timestamp baseline.
//!
//! Per tick, for each ball in order: integrate velocity, run the ball through
//! every wall, test hazards against the tentative position, then commit.
//! After all balls have moved the goal region is evaluated.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collision::{ContactDims, collide_walls};
use super::integrate::integrate_velocity;
use super::level::{LevelSet, Maze};
use super::state::{Ball, BallTag, RunPhase};
use crate::error::{MazeError, Result};
use crate::input::TiltInput;
use crate::settings::{Difficulty, Settings};

/// Why a run ended in failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// Ball `ball` fell into hazard `hazard`
    Hazard { ball: usize, hazard: usize },
    /// Balls entered the goal, but not exactly the required set
    WrongSet { inside: BTreeSet<BallTag> },
}

/// Result of one frame or tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The simulation is not running; nothing happened
    Idle,
    /// Keep delivering frames
    Continue,
    /// Exactly the required balls reached the goal; the run is over
    Won,
    /// The run failed and the level has been reset
    Failed(FailReason),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Won | Outcome::Failed(_))
    }
}

/// What the presentation layer needs after a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub outcome: Outcome,
    /// Ball positions in spawn order
    pub balls: Vec<(BallTag, Vec2)>,
    /// Per-hazard highlight flags
    pub hazards_triggered: Vec<bool>,
}

/// Owns the current level and every ball
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    levels: LevelSet,
    maze: Maze,
    balls: Vec<Ball>,
    phase: RunPhase,
    input: Option<TiltInput>,
    previous_timestamp: Option<f64>,
    ticks: u64,
}

impl Simulation {
    /// Load `settings.level` from `levels`. Fails if the settings are out of
    /// range or the key is unknown.
    pub fn new(levels: LevelSet, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let data = levels.get(&settings.level)?;
        let maze = Maze::build(
            &settings.level,
            data,
            &settings,
            settings.difficulty.hazards_active(),
        )?;
        let balls = maze.spawn_balls();
        log::info!(
            "Loaded {} ({} walls, {} hazards, {} balls, {})",
            maze.key,
            maze.walls.len(),
            maze.hazards.len(),
            balls.len(),
            settings.difficulty.as_str()
        );

        Ok(Self {
            settings,
            levels,
            maze,
            balls,
            phase: RunPhase::Idle,
            input: None,
            previous_timestamp: None,
            ticks: 0,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    /// Ticks simulated since the level was last (re)loaded
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Latest tilt; read once at the start of each tick
    pub fn set_input(&mut self, input: TiltInput) {
        self.input = Some(input);
    }

    pub fn input(&self) -> Option<TiltInput> {
        self.input
    }

    /// Begin delivering frames. The next frame sets the timestamp baseline.
    pub fn start(&mut self) {
        if self.phase == RunPhase::Idle {
            self.phase = RunPhase::Running;
            self.previous_timestamp = None;
            log::info!("Run started on {}", self.maze.key);
        }
    }

    /// Return the level to its static layout: balls back at their spawn
    /// points at rest, hazards cleared and armed for the current difficulty,
    /// input forgotten. The maze already holds everything needed, so this
    /// cannot fail.
    pub fn reset(&mut self) {
        self.maze.reset_hazards(self.settings.difficulty.hazards_active());
        self.balls = self.maze.spawn_balls();
        self.phase = RunPhase::Idle;
        self.input = None;
        self.previous_timestamp = None;
        self.ticks = 0;
        log::info!("Level {} reset", self.maze.key);
    }

    /// Restart the current level
    pub fn restart(&mut self) {
        self.reset();
    }

    /// Switch difficulty; reloads the level
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        log::info!("Difficulty: {}", difficulty.as_str());
        self.reset();
    }

    pub fn toggle_difficulty(&mut self) {
        self.set_difficulty(self.settings.difficulty.toggled());
    }

    /// Swap in another level. On error the current level is kept.
    pub fn load_level(&mut self, key: &str) -> Result<()> {
        let data = self.levels.get(key)?;
        let maze = Maze::build(key, data, &self.settings, self.settings.difficulty.hazards_active())?;
        self.settings.level = key.to_string();
        self.maze = maze;
        self.reset();
        Ok(())
    }

    /// Host frame callback
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<FrameReport> {
        if self.phase != RunPhase::Running {
            return Ok(self.report(Outcome::Idle));
        }

        let Some(previous) = self.previous_timestamp else {
            self.previous_timestamp = Some(timestamp_ms);
            return Ok(self.report(Outcome::Continue));
        };

        let time_scale = ((timestamp_ms - previous) / self.settings.frame_ms) as f32;
        let report = self.tick(time_scale)?;
        if report.outcome == Outcome::Continue {
            self.previous_timestamp = Some(timestamp_ms);
        }
        Ok(report)
    }

    /// Advance every ball once with the given time scale
    pub fn tick(&mut self, time_scale: f32) -> Result<FrameReport> {
        if self.phase != RunPhase::Running {
            return Ok(self.report(Outcome::Idle));
        }
        self.ticks += 1;

        // No tilt yet: nothing moves, but the goal is still evaluated
        if let Some(input) = self.input {
            let step = input.scaled(time_scale);
            let dims = ContactDims::from_settings(&self.settings);
            let max_velocity = self.settings.max_velocity;

            for index in 0..self.balls.len() {
                let ball = &mut self.balls[index];
                ball.vel = integrate_velocity(ball.vel, &step, max_velocity);

                let mut motion = ball.begin_motion();
                collide_walls(&mut motion, &self.maze.walls, &dims);

                if let Some(hazard) = self.maze.hazards.iter().position(|h| h.captures(motion.next)) {
                    self.maze.hazards[hazard].triggered = true;
                    log::debug!("Ball {} fell into hazard {} at {:?}", index, hazard, motion.next);
                    return Ok(self.fail(FailReason::Hazard { ball: index, hazard }));
                }

                ball.commit(motion);
            }

            if let Some(index) = self.balls.iter().position(|b| !b.is_finite()) {
                self.phase = RunPhase::Halted;
                log::error!("Ball {} went non-finite: {:?}", index, self.balls[index]);
                return Err(MazeError::NonFinite { ball: index });
            }
        }

        Ok(self.evaluate_goal())
    }

    fn evaluate_goal(&mut self) -> FrameReport {
        let inside: BTreeSet<BallTag> = self
            .balls
            .iter()
            .filter(|b| self.maze.goal.contains(b.pos))
            .map(|b| b.tag)
            .collect();

        if inside.is_empty() {
            return self.report(Outcome::Continue);
        }

        log::debug!("Goal holds {:?}, requires {:?}", inside, self.maze.required);
        if inside == self.maze.required {
            self.phase = RunPhase::Won;
            log::info!("Won {} after {} ticks", self.maze.key, self.ticks);
            self.report(Outcome::Won)
        } else {
            self.fail(FailReason::WrongSet { inside })
        }
    }

    /// Report the failure as the player saw it, then reset the level
    fn fail(&mut self, reason: FailReason) -> FrameReport {
        log::info!("Run failed on {}: {:?}", self.maze.key, reason);
        let report = self.report(Outcome::Failed(reason));
        self.reset();
        report
    }

    fn report(&self, outcome: Outcome) -> FrameReport {
        FrameReport {
            outcome,
            balls: self.balls.iter().map(|b| (b.tag, b.pos)).collect(),
            hazards_triggered: self.maze.hazards.iter().map(|h| h.triggered).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Wall;

    fn flat() -> TiltInput {
        TiltInput {
            accel: Vec2::ZERO,
            friction: Vec2::ZERO,
        }
    }

    fn running() -> Simulation {
        let mut sim = Simulation::new(LevelSet::builtin(), Settings::default()).unwrap();
        sim.start();
        sim
    }

    #[test]
    fn test_new_is_idle() {
        let mut sim = Simulation::new(LevelSet::builtin(), Settings::default()).unwrap();
        assert_eq!(sim.phase(), RunPhase::Idle);
        assert_eq!(sim.balls().len(), 4);
        assert_eq!(sim.tick(1.0).unwrap().outcome, Outcome::Idle);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_body_bounce_scenario() {
        let mut sim = running();
        sim.maze.walls = vec![Wall {
            anchor: Vec2::new(90.0, 90.0),
            horizontal: true,
            length: 20.0,
        }];
        sim.maze.hazards.clear();
        sim.balls.truncate(1);
        sim.balls[0].pos = Vec2::new(100.0, 100.0);
        sim.balls[0].vel = Vec2::new(0.0, 2.0);
        sim.set_input(flat());

        let report = sim.tick(1.0).unwrap();
        assert_eq!(report.outcome, Outcome::Continue);
        let ball = &sim.balls()[0];
        assert!((ball.vel.y + 2.0 / 3.0).abs() < 1e-6);
        // Snapped to wallY + t/2 + r = 103, then integrated the bounced velocity
        assert!((ball.pos.y - (103.0 - 2.0 / 3.0)).abs() < 1e-5);
        assert_eq!(ball.pos.x, 100.0);
    }

    #[test]
    fn test_no_input_means_no_motion() {
        let mut sim = running();
        let before = sim.balls().to_vec();
        assert_eq!(sim.tick(1.0).unwrap().outcome, Outcome::Continue);
        assert_eq!(sim.balls(), &before[..]);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_hazard_triggered_flag_reported() {
        let mut sim = Simulation::new(
            LevelSet::builtin(),
            Settings {
                difficulty: Difficulty::Hard,
                ..Settings::default()
            },
        )
        .unwrap();
        sim.start();
        // Drop ball 0 straight onto hazard 0
        sim.balls[0].pos = sim.maze.hazards[0].pos;
        sim.set_input(flat());

        let report = sim.tick(1.0).unwrap();
        assert_eq!(
            report.outcome,
            Outcome::Failed(FailReason::Hazard { ball: 0, hazard: 0 })
        );
        assert!(report.hazards_triggered[0]);
        assert!(report.hazards_triggered[1..].iter().all(|t| !t));
        // Reset already happened
        assert_eq!(sim.phase(), RunPhase::Idle);
        assert!(sim.maze().hazards.iter().all(|h| !h.triggered));
        assert_eq!(sim.balls()[0].pos, Vec2::new(17.5, 17.5));
    }

    #[test]
    fn test_hazard_aborts_remaining_balls() {
        let mut sim = Simulation::new(
            LevelSet::builtin(),
            Settings {
                difficulty: Difficulty::Hard,
                ..Settings::default()
            },
        )
        .unwrap();
        sim.start();
        sim.balls[0].pos = sim.maze.hazards[0].pos;
        sim.set_input(TiltInput {
            accel: Vec2::new(0.5, 0.0),
            friction: Vec2::ZERO,
        });

        let report = sim.tick(1.0).unwrap();
        // Later balls were never moved in the failing tick
        assert_eq!(report.balls[1].1, Vec2::new(332.5, 17.5));
        assert_eq!(report.balls[3].1, Vec2::new(332.5, 297.5));
    }

    #[test]
    fn test_frame_time_scale() {
        let mut sim = running();
        sim.set_input(TiltInput {
            accel: Vec2::new(0.1, 0.0),
            friction: Vec2::ZERO,
        });

        assert_eq!(sim.frame(1000.0).unwrap().outcome, Outcome::Continue);
        assert_eq!(sim.ticks(), 0);

        // 32 ms is two frame intervals: accel doubles to 0.2
        sim.frame(1032.0).unwrap();
        assert_eq!(sim.ticks(), 1);
        assert!((sim.balls()[0].vel.x - 0.2).abs() < 1e-6);
        assert!((sim.balls()[0].pos.x - 17.7).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_halts() {
        let mut sim = running();
        sim.balls[0].vel = Vec2::new(f32::NAN, 0.0);
        sim.set_input(flat());
        assert!(matches!(sim.tick(1.0), Err(MazeError::NonFinite { ball: 0 })));
        assert_eq!(sim.phase(), RunPhase::Halted);
        assert_eq!(sim.frame(5.0).unwrap().outcome, Outcome::Idle);
    }

    #[test]
    fn test_difficulty_toggle_resets() {
        let mut sim = running();
        sim.set_input(flat());
        sim.toggle_difficulty();
        assert_eq!(sim.difficulty(), Difficulty::Hard);
        assert_eq!(sim.phase(), RunPhase::Idle);
        assert!(sim.input().is_none());
        assert!(sim.maze().hazards.iter().all(|h| h.active));

        sim.set_difficulty(Difficulty::Easy);
        assert!(sim.maze().hazards.iter().all(|h| !h.active));
        assert_eq!(sim.maze().hazards.len(), 8);
    }

    #[test]
    fn test_reset_rearms_hazards_in_place() {
        let mut sim = running();
        let walls = sim.maze().walls.clone();
        sim.maze.hazards[2].triggered = true;
        sim.balls[1].vel = Vec2::new(1.0, -1.0);

        sim.settings.difficulty = Difficulty::Hard;
        sim.reset();
        assert!(sim.maze().hazards.iter().all(|h| h.active && !h.triggered));
        assert_eq!(sim.maze().walls, walls);
        assert_eq!(sim.balls()[1].vel, Vec2::ZERO);
        assert_eq!(sim.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_load_classic_level() {
        let mut sim = running();
        sim.load_level("classic").unwrap();
        assert_eq!(sim.maze().key, "classic");
        assert_eq!(sim.settings().level, "classic");
        assert_eq!(sim.maze().walls.len(), 46);
        assert_eq!(sim.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let settings = Settings {
            max_velocity: -1.0,
            ..Settings::default()
        };
        assert!(matches!(
            Simulation::new(LevelSet::builtin(), settings),
            Err(MazeError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_load_unknown_level_keeps_current() {
        let mut sim = running();
        assert!(matches!(
            sim.load_level("missing"),
            Err(MazeError::UnknownLevel(_))
        ));
        assert_eq!(sim.maze().key, "level1");
        assert_eq!(sim.phase(), RunPhase::Running);
    }
}
