//! Error taxonomy for the simulator, split by failure domain per §7 of the
//! design: scheduling errors indicate a bug in an actor, resource
//! violations indicate protocol misuse of the Wood, and configuration
//! errors are construction-time and fatal.

use thiserror::Error;

/// Errors raised by [`crate::runtime::Runtime`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("the runtime has no registered actors to step")]
    NoObjectsToStep,

    #[error(
        "{consecutive} consecutive step() calls left virtual time unchanged \
         at {timestamp} — no actor is requesting a sleep, the simulation \
         would livelock"
    )]
    NoTimestampProgression { consecutive: u32, timestamp: f64 },

    #[error(
        "actor `{actor}` requested a sleep of {seconds}, but a step's sleep \
         request must be strictly positive"
    )]
    NonPositiveSleep { actor: String, seconds: f64 },

    #[error(
        "next wake timestamp {next} is earlier than the current clock {current} \
         — sleeping objects should all wake on or after the current timestamp"
    )]
    InconsistentWakeTime { next: f64, current: f64 },
}

/// Errors raised by [`crate::wood::Wood`].
#[derive(Debug, Error)]
pub enum WoodError {
    #[error("a move has been scheduled; no new work-locks may be acquired")]
    MoveScheduled,

    #[error("move() was called while {ongoing_work} work-lock(s) are still held")]
    MovedWhileWorkActive { ongoing_work: u32 },

    #[error("move distance must be strictly positive, got {0}")]
    InvalidMoveDistance(f64),

    #[error("pick() requires start_pos < end_pos with start_pos >= 0, got start={start_pos} end={end_pos}")]
    InvalidPickRange { start_pos: f64, end_pos: f64 },

    #[error("pick() called without holding a work-lock")]
    WorkLockNotHeld,
}

/// Errors raised while parsing or instantiating a [`crate::config::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("fastener density for {0} is missing — all four fastener kinds must be specified")]
    MissingFastenerDensity(&'static str),

    #[error("fastener density for {kind} must be non-negative, got {density}")]
    NegativeFastenerDensity { kind: &'static str, density: f64 },

    #[error("pick probability for {kind} must be in (0, 1], got {probability}")]
    InvalidPickProbability { kind: &'static str, probability: f64 },

    #[error(
        "duplicate cell: start_pos={start_pos} end_pos={end_pos} surface={surface} is already \
         registered — two pickers must not resolve to the same placement and surface"
    )]
    DuplicateCell {
        start_pos: f64,
        end_pos: f64,
        surface: &'static str,
    },
}
