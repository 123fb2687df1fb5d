//! # Simulation Error Types
//!
//! Only startup can fail: config parsing, config validation and the
//! asset load batch. Gameplay failures inside a tick resolve to a no-op
//! plus a feedback message and never surface here.

use std::path::PathBuf;

use stranded_economy::EconomyError;
use thiserror::Error;

/// Errors raised while building a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    /// The config file is not valid TOML for `SimConfig`.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A model in the startup batch failed to load.
    #[error("failed to load asset '{id}': {reason}")]
    AssetLoad {
        /// Identifier of the failing model.
        id: String,
        /// Reason reported by the asset source.
        reason: String,
    },

    /// The config parsed but holds values the simulation cannot run with.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Economy tables rejected at startup.
    #[error(transparent)]
    Economy(#[from] EconomyError),
}

/// Result type for simulation setup.
pub type SimResult<T> = Result<T, SimError>;
