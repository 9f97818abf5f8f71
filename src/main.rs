//! Tilt Maze headless runner
//!
//! Drives the simulation with synthetic frames. Tilt comes either from a
//! fixed `--tilt` rotation or from a seeded random wander, so runs are
//! reproducible.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tilt_maze::sim::{LevelSet, Outcome, RunPhase, Simulation};
use tilt_maze::{Difficulty, Result, Settings, TiltInput};

/// Largest board rotation (degrees) the random wander will reach
const WANDER_LIMIT: f32 = 12.0;
/// Frames between wander direction changes
const WANDER_PERIOD: u64 = 30;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tilt-maze simulation runner")]
struct Args {
    /// Level key to play
    #[arg(long)]
    level: Option<String>,
    /// Extra levels (JSON object of key -> level)
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Hard mode: hazards are live
    #[arg(long)]
    hard: bool,
    /// Difficulty by name (easy/hard, or e/h)
    #[arg(long, value_parser = parse_difficulty, conflicts_with = "hard")]
    difficulty: Option<Difficulty>,
    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Seed for the random tilt wander
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Fixed board rotation "X,Y" in degrees instead of the wander
    #[arg(long, value_parser = parse_tilt, allow_hyphen_values = true)]
    tilt: Option<(f32, f32)>,
    /// Keep playing after a failure instead of stopping
    #[arg(long)]
    retry: bool,
}

fn parse_tilt(s: &str) -> std::result::Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {s:?}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn parse_difficulty(s: &str) -> std::result::Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty {s:?}, expected easy or hard"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(outcome) => {
            log::info!("Finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Outcome> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(level) = &args.level {
        settings.level = level.clone();
    }
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    if args.hard {
        settings.difficulty = Difficulty::Hard;
    }

    let mut levels = LevelSet::builtin();
    if let Some(path) = &args.levels {
        levels.load_file(path)?;
    }

    let gravity = settings.gravity;
    let friction = settings.friction_coeff;
    let frame_ms = settings.frame_ms;
    let mut sim = Simulation::new(levels, settings)?;
    let mut rng = Pcg32::seed_from_u64(args.seed);
    let mut rotation = args.tilt.unwrap_or((0.0, 0.0));
    let mut last = Outcome::Idle;

    for frame in 0..args.frames {
        if sim.phase() == RunPhase::Idle {
            sim.start();
        }

        if args.tilt.is_none() && frame % WANDER_PERIOD == 0 {
            rotation = (
                rng.random_range(-WANDER_LIMIT..=WANDER_LIMIT),
                rng.random_range(-WANDER_LIMIT..=WANDER_LIMIT),
            );
        }
        sim.set_input(TiltInput::from_rotation(rotation.0, rotation.1, gravity, friction));

        let report = sim.frame(frame as f64 * frame_ms)?;
        match &report.outcome {
            Outcome::Won => {
                log::info!("Goal reached on frame {}", frame);
                return Ok(report.outcome);
            }
            Outcome::Failed(reason) => {
                log::info!("Frame {}: run failed ({:?})", frame, reason);
                if !args.retry {
                    return Ok(report.outcome);
                }
            }
            _ => {}
        }
        last = report.outcome;
    }

    for (tag, pos) in sim.balls().iter().map(|b| (b.tag, b.pos)) {
        log::info!("{:>6} ball at ({:.1}, {:.1})", tag.as_str(), pos.x, pos.y);
    }
    Ok(last)
}
