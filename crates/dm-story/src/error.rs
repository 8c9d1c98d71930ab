//! Error types for campaign building and loading.

use std::path::PathBuf;

use thiserror::Error;

use dm_mechanics::MechError;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// A pool the sequencer needed but found empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// No intro blocks.
    Intro,
    /// No resolution blocks.
    Resolution,
    /// Neither encounter nor event blocks, with a non-empty middle requested.
    Middle,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intro => write!(f, "intro"),
            Self::Resolution => write!(f, "resolution"),
            Self::Middle => write!(f, "encounter/event"),
        }
    }
}

/// Errors that can occur while loading content or building a campaign.
#[derive(Debug, Error)]
pub enum StoryError {
    /// The content has no blocks for a pool the campaign requires.
    #[error("no {0} blocks available")]
    EmptyPool(PoolKind),

    /// The campaign configuration is inconsistent.
    #[error("invalid campaign config: {0}")]
    InvalidConfig(String),

    /// A campaign file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A campaign file is not valid JSON or does not match the format.
    #[error("invalid campaign file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Mechanics error (bad dice notation, unusable character sheet).
    #[error("{0}")]
    Mechanics(#[from] MechError),
}
