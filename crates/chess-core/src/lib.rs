//! Game records for the league statistics pipeline.
//!
//! `pgn` turns a round's PGN text into [`ParsedGame`]s, replaying every move
//! through shakmaty; `clock` recovers the `[%clk]`/`[%eval]` commands the
//! normalized copy no longer carries.

pub mod clock;
pub mod error;
pub mod model;
pub mod pgn;

pub use error::PgnError;
pub use model::{
    with_moves, Evaluation, GameResult, MoveAnnotation, MoveFlags, ParsedGame, PieceCensus,
    PieceCounts, PieceKind, Side, SpecialMoves,
};
pub use pgn::{parse_game, parse_games, split_games, GameParseFailure, ParseOutcome};
