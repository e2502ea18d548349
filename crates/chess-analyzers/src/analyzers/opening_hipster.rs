use chess_core::ParsedGame;
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::openings;
use crate::records::{Extremum, GameRef};

/// Plies that make up an opening sequence.
pub const SEQUENCE_PLIES: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HipsterRecord {
    pub eco: String,
    pub name: String,
    pub moves: String,
    pub obscurity_score: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

/// The named opening line with the highest obscurity score.
pub struct OpeningHipsterAnalyzer {
    best: Extremum<u32, HipsterRecord>,
}

impl OpeningHipsterAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
        }
    }
}

impl Default for OpeningHipsterAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for OpeningHipsterAnalyzer {
    fn name(&self) -> &'static str {
        "opening_hipster"
    }

    fn start_game(&mut self, _game: &ParsedGame) {}

    fn process_move(&mut self, _ctx: &MoveContext) {}

    fn finish_game(&mut self, game: &ParsedGame) {
        if game.ply_count() < SEQUENCE_PLIES {
            return;
        }
        let sequence = game.opening_sequence(SEQUENCE_PLIES);
        let Some(opening) = openings::lookup(&sequence) else {
            return;
        };
        let score = opening.obscurity_score();
        self.best.offer(score, || HipsterRecord {
            eco: opening.eco.to_string(),
            name: opening.name.to_string(),
            moves: sequence.join(" "),
            obscurity_score: score,
            game: GameRef::of(game),
        });
    }
}

impl Superlative for OpeningHipsterAnalyzer {
    type Record = HipsterRecord;

    fn into_record(self) -> Option<HipsterRecord> {
        self.best.into_record()
    }
}
