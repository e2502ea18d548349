//! Round-wide chess superlatives.
//!
//! Each detector in [`analyzers`] processes games move-by-move using shakmaty
//! for board state and keeps the single best record for the round. The main
//! entry point is [`compute_fun_stats`], which replays every game once for all
//! detectors and adds the clock awards from [`time`].

pub mod analyzer_trait;
pub mod analyzers;
pub mod openings;
pub mod phases;
pub mod records;
pub mod time;
pub mod tracker;
pub mod unified;

pub use analyzer_trait::{replay, run_analyzer, GameAnalyzer, MoveContext, Superlative};
pub use openings::{lookup as lookup_opening, Opening};
pub use phases::{detect_phases, minor_major_count, PhaseSpan};
pub use records::GameRef;
pub use time::{analyze_game_time, analyze_round_time, GameTiming, TimeAwards};
pub use unified::{compute_fun_stats, FunStats};
