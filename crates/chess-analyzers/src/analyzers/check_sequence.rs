use chess_core::{ParsedGame, Side};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::analyzers::capture_sequence::SequenceRecord;
use crate::records::{Extremum, GameRef};

/// Longest string of checks given by one side. Quiet moves and the
/// opponent's replies in between do not break it; a check by the other
/// side starts a new run. A lone check is not a sequence.
pub struct CheckSequenceAnalyzer {
    best: Extremum<usize, SequenceRecord>,
    last_checker: Option<Side>,
    current: usize,
    current_start: usize,
    longest: usize,
    longest_start: usize,
}

impl CheckSequenceAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            last_checker: None,
            current: 0,
            current_start: 0,
            longest: 0,
            longest_start: 0,
        }
    }
}

impl Default for CheckSequenceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for CheckSequenceAnalyzer {
    fn name(&self) -> &'static str {
        "check_sequence"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.last_checker = None;
        self.current = 0;
        self.current_start = 0;
        self.longest = 0;
        self.longest_start = 0;
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        if !ctx.mv.gives_check() {
            return;
        }
        if self.last_checker == Some(ctx.mv.color) {
            self.current += 1;
            if self.current > self.longest {
                self.longest = self.current;
                self.longest_start = self.current_start;
            }
        } else {
            self.current = 1;
            self.current_start = ctx.mv.ply;
        }
        self.last_checker = Some(ctx.mv.color);
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

impl Superlative for CheckSequenceAnalyzer {
    type Record = SequenceRecord;

    fn into_record(self) -> Option<SequenceRecord> {
        self.best.into_record()
    }
}
