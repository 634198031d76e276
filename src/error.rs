//! Error types for configuration and high score storage

use std::path::PathBuf;

use thiserror::Error;

/// Rejected tuning, reported before a session starts
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A single value is outside its allowed range
    #[error("{field} must be {requirement} (got {value})")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    /// A min/max pair is inverted
    #[error("{field}: max ({max}) is below min ({min})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    /// Tuning file could not be read
    #[error("failed to read tuning from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Tuning JSON is malformed
    #[error("malformed tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// High score storage failure (never fatal to a session)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("high score record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// Backend is not reachable (e.g. no LocalStorage in this browser context)
    #[error("high score storage unavailable")]
    Unavailable,
}
