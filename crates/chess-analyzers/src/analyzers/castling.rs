use chess_core::{ParsedGame, Side};
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingRaceRecord {
    pub moves: usize,
    pub winner: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingMoveRecord {
    pub moves: usize,
    pub color: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Among games where both kings castled, the earliest first castle.
pub struct CastlingRaceAnalyzer {
    best: Extremum<usize, CastlingRaceRecord>,
    castled: [bool; 2],
    first: Option<(usize, Side)>,
}

impl CastlingRaceAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::min(),
            castled: [false; 2],
            first: None,
        }
    }
}

impl Default for CastlingRaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for CastlingRaceAnalyzer {
    fn name(&self) -> &'static str {
        "castling_race"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.castled = [false; 2];
        self.first = None;
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if !ctx.mv.is_castle() {
            return;
        }
        self.castled[ctx.mv.color as usize] = true;
        if self.first.is_none() {
            self.first = Some((ctx.mv.move_number_full(), ctx.mv.color));
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        if !(self.castled[0] && self.castled[1]) {
            return;
        }
        if let Some((moves, winner)) = self.first {
            self.best.offer(moves, || CastlingRaceRecord {
                moves,
                winner,
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for CastlingRaceAnalyzer {
    type Record = CastlingRaceRecord;

    fn into_record(self) -> Option<CastlingRaceRecord> {
        self.best.into_record()
    }
}

/// The latest castle of the round, by either side.
pub struct SlowestCastlingAnalyzer {
    best: Extremum<usize, CastlingMoveRecord>,
    castles: Vec<(usize, Side)>,
}

impl SlowestCastlingAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            castles: Vec::new(),
        }
    }
}

impl Default for SlowestCastlingAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for SlowestCastlingAnalyzer {
    fn name(&self) -> &'static str {
        "slowest_castling"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.castles.clear();
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if ctx.mv.is_castle() {
            self.castles.push((ctx.mv.move_number_full(), ctx.mv.color));
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        for &(moves, color) in &self.castles {
            self.best.offer(moves, || CastlingMoveRecord {
                moves,
                color,
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for SlowestCastlingAnalyzer {
    type Record = CastlingMoveRecord;

    fn into_record(self) -> Option<CastlingMoveRecord> {
        self.best.into_record()
    }
}
