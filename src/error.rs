//! Error types.
//!
//! Duplicate or stale clicks are not errors and never appear here: the
//! engine ignores them.

use thiserror::Error;

/// Invalid grid requests. Detected before any card is created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid {rows}x{columns} has no cells")]
    EmptyGrid { rows: u32, columns: u32 },

    #[error("grid {rows}x{columns} has an odd number of cells")]
    OddCellCount { rows: u32, columns: u32 },

    #[error("grid {rows}x{columns} has too many cells")]
    TooLarge { rows: u32, columns: u32 },

    #[error("grid needs {needed} distinct faces but only {available} exist")]
    InsufficientIdentities { needed: u32, available: u32 },
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duration `{name}` must be positive")]
    NonPositiveDuration { name: &'static str },

    #[error("invalid scoring rules: {0}")]
    InvalidScoring(String),

    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Record store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid grid key: {0}")]
    InvalidKey(String),
}

/// Session setup and control failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is missing its {0}")]
    MissingCollaborator(&'static str),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no grid has been started")]
    NoActiveGrid,
}

/// Non-fatal problems reported by a session. Gameplay continues.
#[derive(Debug, Error)]
pub enum SessionWarning {
    #[error("failed to save result for {key}: {source}")]
    SaveFailed {
        key: String,
        #[source]
        source: StoreError,
    },
}
