use chess_core::{ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RookLiftRecord {
    pub move_number: usize,
    pub color: Side,
    /// "White's a1 Rook"
    pub rook: String,
    pub square: String,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Earliest rook to leave its own back rank.
pub struct RookLiftAnalyzer {
    best: Extremum<usize, RookLiftRecord>,
    first: Option<(usize, Side, String, String)>,
}

impl RookLiftAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::min(),
            first: None,
        }
    }
}

impl Default for RookLiftAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for RookLiftAnalyzer {
    fn name(&self) -> &'static str {
        "rook_lift"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.first = None;
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if self.first.is_some() || ctx.mv.piece != PieceKind::Rook {
            return;
        }
        let back = ctx.mv.color.back_rank();
        if ctx.mv.from.rank() as i32 != back || ctx.mv.to.rank() as i32 == back {
            return;
        }
        let piece = ctx.tracker.piece(ctx.piece);
        self.first = Some((
            ctx.mv.move_number_full(),
            ctx.mv.color,
            piece.label(),
            piece.start.to_string(),
        ));
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        if let Some((move_number, color, rook, square)) = self.first.take() {
            self.best.offer(move_number, || RookLiftRecord {
                move_number,
                color,
                rook,
                square,
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for RookLiftAnalyzer {
    type Record = RookLiftRecord;

    fn into_record(self) -> Option<RookLiftRecord> {
        self.best.into_record()
    }
}
