//! Error types for fold_layout

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching, measuring or placing items
///
/// These come from the host's recycler. The carousel never propagates them:
/// a failing pass is logged and the previous frame stays on screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The recycler could not produce an item for an index
    #[error("failed to fetch item {index}: {reason}")]
    Fetch { index: usize, reason: String },

    /// Measuring an item failed
    #[error("failed to measure item {index}: {reason}")]
    Measure { index: usize, reason: String },

    /// Attaching, placing or transforming an item failed
    #[error("failed to place item {index}: {reason}")]
    Place { index: usize, reason: String },
}

/// Result type for recycler operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors raised while loading a carousel configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML did not match the config schema
    #[error("failed to parse carousel config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid carousel config: {0}")]
    Invalid(String),
}
