use chess_core::{ParsedGame, Side};
use serde::{Deserialize, Serialize};
use shakmaty::Square;

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};
use crate::tracker::TrackedPiece;

const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterStageRecord {
    pub moves: u32,
    /// "White's g1 Knight"
    pub piece: String,
    pub start_square: String,
    pub color: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

/// The piece that stepped onto d4/e4/d5/e5 most often.
pub struct CenterStageAnalyzer {
    best: Extremum<u32, CenterStageRecord>,
    entries: Vec<(usize, TrackedPiece, u32)>,
}

impl CenterStageAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            entries: Vec::new(),
        }
    }
}

impl Default for CenterStageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for CenterStageAnalyzer {
    fn name(&self) -> &'static str {
        "center_stage"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.entries.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if !CENTER.contains(&ctx.mv.to) {
            return;
        }
        match self.entries.iter_mut().find(|(id, _, _)| *id == ctx.piece) {
            Some(entry) => entry.2 += 1,
            None => self.entries.push((ctx.piece, *ctx.tracker.piece(ctx.piece), 1)),
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        for &(_, piece, moves) in &self.entries {
            self.best.offer(moves, || CenterStageRecord {
                moves,
                piece: piece.label(),
                start_square: piece.start.to_string(),
                color: piece.side,
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for CenterStageAnalyzer {
    type Record = CenterStageRecord;

    fn into_record(self) -> Option<CenterStageRecord> {
        self.best.into_record()
    }
}
