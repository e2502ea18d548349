use chess_core::{ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueenTradeRecord {
    pub moves: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueenTrades {
    pub fastest: Option<QueenTradeRecord>,
    pub slowest: Option<QueenTradeRecord>,
}

/// Both queens gone from the board; the trade is dated by the second capture.
pub struct QueenTradeAnalyzer {
    fastest: Extremum<usize, QueenTradeRecord>,
    slowest: Extremum<usize, QueenTradeRecord>,
    queen_lost: [bool; 2],
    trade_move: Option<usize>,
}

impl QueenTradeAnalyzer {
    pub fn new() -> Self {
        Self {
            fastest: Extremum::min(),
            slowest: Extremum::max(),
            queen_lost: [false; 2],
            trade_move: None,
        }
    }
}

impl Default for QueenTradeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for QueenTradeAnalyzer {
    fn name(&self) -> &'static str {
        "queen_trade"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.queen_lost = [false; 2];
        self.trade_move = None;
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if ctx.mv.captured != Some(PieceKind::Queen) {
            return;
        }
        self.queen_lost[ctx.mv.color.opposite() as usize] = true;
        let both = self.queen_lost[Side::White as usize] && self.queen_lost[Side::Black as usize];
        if both && self.trade_move.is_none() {
            self.trade_move = Some(ctx.mv.move_number_full());
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        let Some(moves) = self.trade_move else {
            return;
        };
        let record = || QueenTradeRecord {
            moves,
            game: GameRef::of(game),
        };
        self.fastest.offer(moves, record);
        self.slowest.offer(moves, record);
    }
}

impl Superlative for QueenTradeAnalyzer {
    type Record = QueenTrades;

    fn into_record(self) -> Option<QueenTrades> {
        Some(QueenTrades {
            fastest: self.fastest.into_record(),
            slowest: self.slowest.into_record(),
        })
    }
}
