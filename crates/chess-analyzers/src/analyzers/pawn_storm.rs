use chess_core::{ParsedGame, PieceKind};
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PawnStormRecord {
    pub count: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Most pawn moves, both colours together, before the opening ends.
pub struct PawnStormAnalyzer {
    best: Extremum<u32, PawnStormRecord>,
    count: u32,
}

impl PawnStormAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            count: 0,
        }
    }
}

impl Default for PawnStormAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for PawnStormAnalyzer {
    fn name(&self) -> &'static str {
        "pawn_storm"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.count = 0;
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if ctx.mv.piece == PieceKind::Pawn && ctx.mv.ply < ctx.phases.opening_end_ply {
            self.count += 1;
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        let count = self.count;
        if count > 0 {
            self.best.offer(count, || PawnStormRecord {
                count,
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for PawnStormAnalyzer {
    type Record = PawnStormRecord;

    fn into_record(self) -> Option<PawnStormRecord> {
        self.best.into_record()
    }
}
