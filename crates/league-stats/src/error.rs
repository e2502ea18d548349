//! Aggregation error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("No round files found for season {season} in {}", dir.display())]
    NoRounds { season: u32, dir: PathBuf },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid team roster: {0}")]
    InvalidRoster(String),

    #[error("Bad file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
