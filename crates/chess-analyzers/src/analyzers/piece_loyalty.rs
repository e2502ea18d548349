use chess_core::{ParsedGame, PieceKind};
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};
use crate::tracker::TrackedPiece;

/// Plies a piece must have waited before it counts as loyal.
pub const MIN_LOYAL_PLIES: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyRecord {
    /// Full moves spent on the starting square before the first move.
    pub moves: usize,
    pub piece: String,
    pub square: String,
    #[serde(flatten)]
    pub game: GameRef,
}

/// The non-pawn piece that waited longest on its home square before moving.
pub struct PieceLoyaltyAnalyzer {
    best: Extremum<usize, LoyaltyRecord>,
    /// (first-move ply, piece id, piece) in the order pieces first moved.
    first_moves: Vec<(usize, usize, TrackedPiece)>,
}

impl PieceLoyaltyAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            first_moves: Vec::new(),
        }
    }
}

impl Default for PieceLoyaltyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for PieceLoyaltyAnalyzer {
    fn name(&self) -> &'static str {
        "piece_loyalty"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.first_moves.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        let piece = *ctx.tracker.piece(ctx.piece);
        if piece.kind == PieceKind::Pawn {
            return;
        }
        if !self.first_moves.iter().any(|&(_, id, _)| id == ctx.piece) {
            self.first_moves.push((ctx.mv.ply, ctx.piece, piece));
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        for &(ply, _, piece) in &self.first_moves {
            if ply < MIN_LOYAL_PLIES {
                continue;
            }
            self.best.offer(ply, || LoyaltyRecord {
                moves: ply.div_ceil(2),
                piece: piece.kind.title().to_string(),
                square: piece.start.to_string(),
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for PieceLoyaltyAnalyzer {
    type Record = LoyaltyRecord;

    fn into_record(self) -> Option<LoyaltyRecord> {
        self.best.into_record()
    }
}
