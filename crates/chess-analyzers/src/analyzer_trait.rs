//! Base trait and the single-pass replay that drives every analyzer.

use chess_core::{MoveAnnotation, ParsedGame};
use shakmaty::{Chess, Position};

use crate::phases::{detect_phases, PhaseSpan};
use crate::tracker::PieceTracker;

/// Context available to analyzers at each move.
pub struct MoveContext<'a> {
    pub game: &'a ParsedGame,
    pub mv: &'a MoveAnnotation,
    pub before: &'a Chess, // position BEFORE the move
    pub after: &'a Chess,
    /// Tracker id of the moving piece.
    pub piece: usize,
    /// Identities after the move has been applied.
    pub tracker: &'a PieceTracker,
    pub phases: &'a PhaseSpan,
}

/// Trait that all analyzers implement.
pub trait GameAnalyzer {
    fn name(&self) -> &'static str;

    /// Reset per-game state.
    fn start_game(&mut self, game: &ParsedGame);

    fn process_move(&mut self, ctx: &MoveContext);

    /// Fold this game's per-game state into the round-wide best.
    fn finish_game(&mut self, game: &ParsedGame);
}

/// An analyzer that ends with one optional superlative for the round.
pub trait Superlative: GameAnalyzer {
    type Record;

    fn into_record(self) -> Option<Self::Record>;
}

/// Replay every move-bearing game once, in index order, feeding all analyzers.
pub fn replay(games: &[&ParsedGame], analyzers: &mut [&mut dyn GameAnalyzer]) {
    for game in games.iter().filter(|g| g.has_moves()) {
        let phases = detect_phases(game);
        for analyzer in analyzers.iter_mut() {
            analyzer.start_game(game);
        }

        let mut pos = Chess::default();
        let mut tracker = PieceTracker::new();
        for m in &game.moves {
            let mut after = pos.clone();
            after.play_unchecked(m.mv);
            let piece = tracker.apply(m);

            let ctx = MoveContext {
                game,
                mv: m,
                before: &pos,
                after: &after,
                piece,
                tracker: &tracker,
                phases: &phases,
            };
            for analyzer in analyzers.iter_mut() {
                analyzer.process_move(&ctx);
            }
            pos = after;
        }

        for analyzer in analyzers.iter_mut() {
            analyzer.finish_game(game);
        }
    }
}

/// Run a single analyzer over the games and take its record.
pub fn run_analyzer<A: Superlative>(games: &[&ParsedGame], mut analyzer: A) -> Option<A::Record> {
    replay(games, &mut [&mut analyzer]);
    analyzer.into_record()
}
