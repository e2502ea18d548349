use std::collections::BTreeMap;

use chess_core::ParsedGame;
use serde::{Deserialize, Serialize};
use shakmaty::{Position, Square};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TensionRecord {
    /// Plies the two pieces spent attacking each other.
    pub moves: usize,
    /// "d4-e5"
    pub squares: String,
    pub start_move: usize,
    pub end_move: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Pairs of enemy pieces that attack each other, keyed by square pair
/// (lower square first).
fn mutual_attacks(ctx: &MoveContext) -> Vec<(Square, Square)> {
    let board = ctx.after.board();
    let mut pairs = Vec::new();
    for a in board.occupied() {
        let Some(piece) = board.piece_at(a) else {
            continue;
        };
        let targets = board.attacks_from(a) & board.by_color(!piece.color);
        for b in targets {
            if a < b && board.attacks_from(b).contains(a) {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

/// Longest stand-off between two pieces that could capture each other.
/// A stand-off still open when the game ends is not counted.
pub struct TensionAnalyzer {
    best: Extremum<usize, TensionRecord>,
    /// Open stand-offs and the ply (1-based) they began on.
    open: BTreeMap<(Square, Square), usize>,
    longest: Option<(usize, (Square, Square), usize, usize)>,
}

impl TensionAnalyzer {
    pub fn new() -> Self {
        Self {
            best: Extremum::max(),
            open: BTreeMap::new(),
            longest: None,
        }
    }
}

impl Default for TensionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for TensionAnalyzer {
    fn name(&self) -> &'static str {
        "longest_tension"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.open.clear();
        self.longest = None;
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        let now = ctx.mv.ply + 1;
        let current = mutual_attacks(ctx);

        let mut still_open = BTreeMap::new();
        for pair in &current {
            let start = self.open.get(pair).copied().unwrap_or(now);
            still_open.insert(*pair, start);
        }
        for (pair, start) in &self.open {
            if still_open.contains_key(pair) {
                continue;
            }
            let duration = now - start;
            if self.longest.map_or(true, |(best, ..)| duration > best) {
                self.longest = Some((duration, *pair, *start, now));
            }
        }
        self.open = still_open;
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        if let Some((duration, (a, b), start, end)) = self.longest {
            self.best.offer(duration, || TensionRecord {
                moves: duration,
                squares: format!("{a}-{b}"),
                start_move: start.div_ceil(2),
                end_move: end.div_ceil(2),
                game: GameRef::of(game),
            });
        }
    }
}

impl Superlative for TensionAnalyzer {
    type Record = TensionRecord;

    fn into_record(self) -> Option<TensionRecord> {
        self.best.into_record()
    }
}
