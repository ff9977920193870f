//! # Simulation Error Types
//!
//! Everything here is a configuration error: terminal, reported once,
//! never retried. The coordinator itself has no error type because its
//! operations cannot fail.

use std::path::PathBuf;

use thiserror::Error;

use crate::actor::ActorId;

/// Errors produced while loading a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("cannot open scenario file {}: {source}", .path.display())]
    Io {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A line did not have the `id role delay duration` shape.
    #[error("line {line}: malformed entry {content:?}: {reason}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The role field was not `R` or `W`.
    #[error("line {line}: unknown role {role:?}, expected 'R' or 'W'")]
    UnknownRole {
        /// 1-based line number.
        line: usize,
        /// The role field as written.
        role: String,
    },

    /// A delay or duration was negative, infinite or not a number.
    #[error("line {line}: {field} must be a finite, non-negative number of seconds, got {value:?}")]
    InvalidDuration {
        /// 1-based line number.
        line: usize,
        /// Which field (`delay` or `duration`).
        field: &'static str,
        /// The field as written.
        value: String,
    },

    /// Two actors share an id.
    #[error("line {line}: duplicate actor id {id}")]
    DuplicateId {
        /// 1-based line number of the second occurrence.
        line: usize,
        /// The repeated id.
        id: ActorId,
    },

    /// The scenario has no actors.
    #[error("scenario contains no actors")]
    Empty,
}

/// Errors produced while loading a simulation config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML could not be parsed into a config.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// `time_scale` must be finite and strictly positive.
    #[error("time_scale must be finite and positive, got {0}")]
    InvalidTimeScale(f64),

    /// A bounded event channel needs room for at least one event.
    #[error("channel_capacity must be at least 1")]
    ZeroChannelCapacity,
}

/// Errors produced by a simulation run.
#[derive(Error, Debug)]
pub enum SimError {
    /// The scenario could not be loaded.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// The config was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The OS refused to start an actor thread.
    #[error("failed to spawn thread for actor {id}: {source}")]
    Spawn {
        /// The actor that could not start.
        id: ActorId,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An actor thread panicked.
    #[error("actor {id} panicked")]
    ActorPanicked {
        /// The first actor found to have panicked.
        id: ActorId,
    },
}

/// Result type for scenario loading.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Result type for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for simulation runs.
pub type SimResult<T> = Result<T, SimError>;
