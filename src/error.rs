//! Crate error taxonomy
//!
//! Asset and level-config failures are fatal at startup; persistence
//! failures are recovered locally in `highscore` and never propagate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    /// A texture/image file was missing or unreadable. Fatal at setup.
    #[error("failed to load asset {path}: {source}")]
    AssetLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A level was requested that the catalog does not define. Fatal.
    #[error("no level defined for index {0}")]
    LevelIndex(usize),

    /// High-score file unreadable/unwritable. Callers treat this as
    /// "no previous high score" rather than failing.
    #[error("high score store: {0}")]
    Persistence(#[from] std::io::Error),
}
