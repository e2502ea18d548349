use std::collections::BTreeSet;

use chess_core::{ParsedGame, Side};
use serde::{Deserialize, Serialize};
use shakmaty::Square;

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};
use crate::tracker::TrackedPiece;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristRecord {
    pub squares: usize,
    pub piece: String,
    pub color: Side,
    pub start_square: String,
    #[serde(flatten)]
    pub game: GameRef,
}

/// The single piece that stood on the most distinct squares.
pub struct SquareTouristAnalyzer {
    best: Extremum<usize, TouristRecord>,
    visits: Vec<(usize, TrackedPiece, BTreeSet<Square>)>,
}

impl SquareTouristAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            visits: Vec::new(),
        }
    }
}

impl Default for SquareTouristAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for SquareTouristAnalyzer {
    fn name(&self) -> &'static str {
        "square_tourist"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.visits.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        let idx = match self.visits.iter().position(|(id, _, _)| *id == ctx.piece) {
            Some(idx) => idx,
            None => {
                let piece = *ctx.tracker.piece(ctx.piece);
                self.visits.push((ctx.piece, piece, BTreeSet::new()));
                self.visits.len() - 1
            }
        };
        let squares = &mut self.visits[idx].2;
        squares.insert(ctx.mv.from);
        squares.insert(ctx.mv.to);
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        for (_, piece, squares) in &self.visits {
            let count = squares.len();
            self.best.offer(count, || TouristRecord {
                squares: count,
                piece: piece.kind.title().to_string(),
                color: piece.side,
                start_square: piece.start.to_string(),
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for SquareTouristAnalyzer {
    type Record = TouristRecord;

    fn into_record(self) -> Option<TouristRecord> {
        self.best.into_record()
    }
}
