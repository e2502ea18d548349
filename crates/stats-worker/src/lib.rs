//! League statistics worker.
//!
//! Turns a round's PGN file into its round document, optionally running
//! Stockfish over every game first, and rebuilds the season document from
//! the round documents on disk.

pub mod analysis;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod pipeline;
pub mod stockfish;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use pipeline::{run_round, run_season, RoundJob};
