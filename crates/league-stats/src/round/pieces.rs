use chess_core::{ParsedGame, PieceCounts, PieceKind};
use serde::{Deserialize, Serialize};

use crate::round1;

/// Moves made by each piece type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceActivity {
    pub pawns: u32,
    pub knights: u32,
    pub bishops: u32,
    pub rooks: u32,
    pub queens: u32,
    pub kings: u32,
}

/// Captured pieces by type. Kings are never captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPieces {
    pub pawns: u32,
    pub knights: u32,
    pub bishops: u32,
    pub rooks: u32,
    pub queens: u32,
}

impl CapturedPieces {
    pub fn total(&self) -> u32 {
        self.pawns + self.knights + self.bishops + self.rooks + self.queens
    }
}

/// Share of the starting pieces still on the board at the end, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalRate {
    pub knights: f64,
    pub bishops: f64,
    pub rooks: f64,
    pub queens: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceStats {
    pub activity: PieceActivity,
    pub captured: CapturedPieces,
    pub survival_rate: SurvivalRate,
}

fn bump_activity(activity: &mut PieceActivity, kind: PieceKind) {
    let slot = match kind {
        PieceKind::Pawn => &mut activity.pawns,
        PieceKind::Knight => &mut activity.knights,
        PieceKind::Bishop => &mut activity.bishops,
        PieceKind::Rook => &mut activity.rooks,
        PieceKind::Queen => &mut activity.queens,
        PieceKind::King => &mut activity.kings,
    };
    *slot += 1;
}

fn bump_captured(captured: &mut CapturedPieces, kind: PieceKind) {
    match kind {
        PieceKind::Pawn => captured.pawns += 1,
        PieceKind::Knight => captured.knights += 1,
        PieceKind::Bishop => captured.bishops += 1,
        PieceKind::Rook => captured.rooks += 1,
        PieceKind::Queen => captured.queens += 1,
        PieceKind::King => {}
    }
}

fn survival(census_total: impl Fn(&PieceCounts) -> u32, played: &[&ParsedGame], start: u32) -> f64 {
    let rates: f64 = played
        .iter()
        .map(|g| {
            let left = census_total(&g.final_census.white) + census_total(&g.final_census.black);
            f64::from(left) / f64::from(start)
        })
        .sum();
    round1(rates / played.len() as f64 * 100.0)
}

pub fn piece_stats(played: &[&ParsedGame]) -> PieceStats {
    let mut stats = PieceStats::default();
    for game in played {
        for m in &game.moves {
            bump_activity(&mut stats.activity, m.piece);
            if let Some(kind) = m.captured {
                bump_captured(&mut stats.captured, kind);
            }
        }
    }

    if !played.is_empty() {
        stats.survival_rate = SurvivalRate {
            knights: survival(|c| c.knights, played, 4),
            bishops: survival(|c| c.bishops, played, 4),
            rooks: survival(|c| c.rooks, played, 4),
            queens: survival(|c| c.queens, played, 2),
        };
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_activity_and_captures() {
        let game = parse_game(0, "1. e4 d5 2. exd5 Qxd5 3. Nc3 Qxg2 4. Bxg2 *").unwrap();
        let stats = piece_stats(&[&game]);
        assert_eq!(stats.activity.pawns, 3);
        assert_eq!(stats.activity.queens, 2);
        assert_eq!(stats.activity.knights, 1);
        assert_eq!(stats.activity.bishops, 1);
        assert_eq!(stats.captured.pawns, 3);
        assert_eq!(stats.captured.queens, 1);
        assert_eq!(stats.captured.total(), 4);
        assert_eq!(stats.survival_rate.queens, 50.0);
        assert_eq!(stats.survival_rate.rooks, 100.0);
    }

    #[test]
    fn test_no_games_leaves_zero_rates() {
        let stats = piece_stats(&[]);
        assert_eq!(stats.survival_rate, SurvivalRate::default());
    }
}
