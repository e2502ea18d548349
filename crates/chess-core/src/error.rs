//! PGN parsing errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PgnError {
    #[error("no headers or move text found")]
    EmptyGame,

    #[error("unreadable move token {token:?} at ply {ply}")]
    InvalidSan { ply: usize, token: String },

    #[error("illegal move {san} at ply {ply}: {reason}")]
    IllegalMove {
        ply: usize,
        san: String,
        reason: String,
    },

    #[error("unsupported starting position: {0}")]
    UnsupportedSetup(String),
}
