//! Error types
//!
//! Terminal game results (win, hazard, wrong ball set) are ordinary
//! [`Outcome`](crate::sim::Outcome) values. Only configuration problems and
//! internal faults surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("unknown level key: {0}")]
    UnknownLevel(String),

    #[error("invalid level {key}: {reason}")]
    InvalidLevel { key: String, reason: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("ball {ball} reached a non-finite state; simulation halted")]
    NonFinite { ball: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
