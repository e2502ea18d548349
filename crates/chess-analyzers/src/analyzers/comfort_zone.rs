use chess_core::{ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

const NON_PAWN: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortZoneRecord {
    pub percentage: u32,
    pub piece_type: String,
    pub moves: u32,
    pub total_non_pawn_moves: u32,
    pub color: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

fn group_name(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::Knight => "knights",
        PieceKind::Bishop => "bishops",
        PieceKind::Rook => "rooks",
        PieceKind::Queen => "queen",
        PieceKind::King => "king",
        PieceKind::Pawn => "pawns",
    }
}

/// Highest share of a side's non-pawn moves made by one piece type.
pub struct ComfortZoneAnalyzer {
    best: Extremum<u32, ComfortZoneRecord>,
    /// Per side, move counts in `NON_PAWN` order.
    counts: [[u32; 5]; 2],
}

impl ComfortZoneAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            counts: [[0; 5]; 2],
        }
    }
}

impl Default for ComfortZoneAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for ComfortZoneAnalyzer {
    fn name(&self) -> &'static str {
        "comfort_zone"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.counts = [[0; 5]; 2];
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if let Some(slot) = NON_PAWN.iter().position(|&k| k == ctx.mv.piece) {
            self.counts[ctx.mv.color as usize][slot] += 1;
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        for side in Side::BOTH {
            let counts = self.counts[side as usize];
            let total: u32 = counts.iter().sum();
            if total == 0 {
                continue;
            }
            // First type wins ties within a side.
            let mut top = 0;
            for slot in 1..counts.len() {
                if counts[slot] > counts[top] {
                    top = slot;
                }
            }
            let moves = counts[top];
            let percentage = (f64::from(moves) / f64::from(total) * 100.0).round() as u32;
            if percentage == 0 {
                continue;
            }
            self.best.offer(percentage, || ComfortZoneRecord {
                percentage,
                piece_type: group_name(NON_PAWN[top]).to_string(),
                moves,
                total_non_pawn_moves: total,
                color: side,
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for ComfortZoneAnalyzer {
    type Record = ComfortZoneRecord;

    fn into_record(self) -> Option<ComfortZoneRecord> {
        self.best.into_record()
    }
}
