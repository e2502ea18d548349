use chess_core::ParsedGame;
use serde::{Deserialize, Serialize};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceRecord {
    pub length: usize,
    pub start_move: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Longest run of consecutive capturing plies, by either side.
pub struct CaptureSequenceAnalyzer {
    best: Extremum<usize, SequenceRecord>,
    current: usize,
    current_start: usize,
    longest: usize,
    longest_start: usize,
}

impl CaptureSequenceAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            current: 0,
            current_start: 0,
            longest: 0,
            longest_start: 0,
        }
    }
}

impl Default for CaptureSequenceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for CaptureSequenceAnalyzer {
    fn name(&self) -> &'static str {
        "capture_sequence"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.current = 0;
        self.current_start = 0;
        self.longest = 0;
        self.longest_start = 0;
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if !ctx.mv.is_capture() {
            self.current = 0;
            return;
        }
        if self.current == 0 {
            self.current_start = ctx.mv.ply;
        }
        self.current += 1;
        if self.current > self.longest {
            self.longest = self.current;
            self.longest_start = self.current_start;
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        if self.longest == 0 {
            return;
        }
        let (length, start) = (self.longest, self.longest_start);
        self.best.offer(length, || SequenceRecord {
            length,
            start_move: start / 2 + 1,
            game: GameRef::of(game),
        });
    }
}

impl Superlative for CaptureSequenceAnalyzer {
    type Record = SequenceRecord;

    fn into_record(self) -> Option<SequenceRecord> {
        self.best.into_record()
    }
}
