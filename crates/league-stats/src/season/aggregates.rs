use serde::{Deserialize, Serialize};

use crate::round::pieces::CapturedPieces;
use crate::round::RoundDocument;
use crate::round1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedTotals {
    pub pawns: u32,
    pub knights: u32,
    pub bishops: u32,
    pub rooks: u32,
    pub queens: u32,
    pub total: u32,
}

impl CapturedTotals {
    fn add(&mut self, captured: &CapturedPieces) {
        self.pawns += captured.pawns;
        self.knights += captured.knights;
        self.bishops += captured.bishops;
        self.rooks += captured.rooks;
        self.queens += captured.queens;
        self.total += captured.total();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonAggregates {
    pub total_games: usize,
    pub games_with_moves: usize,
    /// Plies.
    pub total_moves: usize,
    /// Full moves per game with moves.
    pub average_game_length: f64,
    pub total_blunders: u32,
    pub total_mistakes: u32,
    pub total_checks: u32,
    pub total_en_passant: u32,
    pub total_promotions: u32,
    pub total_castling: u32,
    pub pieces_captured: CapturedTotals,
}

pub fn season_aggregates(rounds: &[RoundDocument]) -> SeasonAggregates {
    let mut agg = SeasonAggregates::default();
    for round in rounds {
        agg.total_games += round.overview.total_games;
        agg.games_with_moves += round.overview.games_with_moves;
        agg.total_moves += round.overview.total_moves;

        if let Some(analysis) = &round.analysis {
            agg.total_blunders += analysis.total_blunders();
            agg.total_mistakes += analysis.total_mistakes();
        }

        let tactics = &round.tactics;
        agg.total_checks += tactics.total_checks;
        agg.total_en_passant += tactics.en_passant_games.iter().map(|g| g.count).sum::<u32>();
        agg.total_promotions += tactics.promotions;
        agg.total_castling += tactics.castling.kingside + tactics.castling.queenside;
        agg.pieces_captured.add(&round.pieces.captured);
    }

    if agg.games_with_moves > 0 {
        agg.average_game_length =
            round1(agg.total_moves as f64 / agg.games_with_moves as f64 / 2.0);
    }
    agg
}
