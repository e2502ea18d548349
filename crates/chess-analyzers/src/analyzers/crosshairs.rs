use chess_core::ParsedGame;
use serde::{Deserialize, Serialize};
use shakmaty::{Color, Position, Square};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosshairsRecord {
    pub square: String,
    pub attackers: u32,
    pub white_attackers: u32,
    pub black_attackers: u32,
    pub move_number: usize,
    #[serde(rename = "move")]
    pub san: String,
    #[serde(flatten)]
    pub game: GameRef,
}

/// The square attacked by the most pieces, of both colours, in any position.
pub struct CrosshairsAnalyzer {
    best: Extremum<u32, CrosshairsRecord>,
}

impl CrosshairsAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
        }
    }
}

impl Default for CrosshairsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for CrosshairsAnalyzer {
    fn name(&self) -> &'static str {
        "crosshairs"
    }

    fn start_game(&mut self, _game: &ParsedGame) {}

    fn process_move(&mut self, ctx: &MoveContext) {
        let board = ctx.after.board();
        let occupied = board.occupied();
        for sq in Square::ALL {
            let white = board.attacks_to(sq, Color::White, occupied).count() as u32;
            let black = board.attacks_to(sq, Color::Black, occupied).count() as u32;
            let total = white + black;
            if total == 0 || !self.best.beats(total) {
                continue;
            }
            self.best.offer(total, || CrosshairsRecord {
                square: sq.to_string(),
                attackers: total,
                white_attackers: white,
                black_attackers: black,
                move_number: ctx.mv.move_number_full(),
                san: ctx.mv.san.clone(),
                game: GameRef::of(ctx.game),
            });
        }
    }

    fn finish_game(&mut self, _game: &ParsedGame) {}
}

impl Superlative for CrosshairsAnalyzer {
    type Record = CrosshairsRecord;

    fn into_record(self) -> Option<CrosshairsRecord> {
        self.best.into_record()
    }
}
