use chess_core::{GameResult, ParsedGame};
use serde::{Deserialize, Serialize};

use crate::{percent, round1};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
    pub white_win_percentage: f64,
    pub black_win_percentage: f64,
    pub draw_percentage: f64,
}

/// Outcome split over every parsed game, forfeits included.
pub fn results(games: &[ParsedGame]) -> Results {
    let count = |r: GameResult| games.iter().filter(|g| g.result == r).count();
    let white_wins = count(GameResult::WhiteWin);
    let black_wins = count(GameResult::BlackWin);
    let draws = count(GameResult::Draw);
    let total = games.len();

    Results {
        white_wins,
        black_wins,
        draws,
        white_win_percentage: round1(percent(white_wins, total)),
        black_win_percentage: round1(percent(black_wins, total)),
        draw_percentage: round1(percent(draws, total)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_split() {
        let games = vec![
            parse_game(0, "[Result \"1-0\"]\n\n1. e4 e5 1-0").unwrap(),
            parse_game(1, "[Result \"1/2-1/2\"]\n\n1. d4 d5 1/2-1/2").unwrap(),
            parse_game(2, "[Result \"1-0\"]\n\n1-0").unwrap(),
        ];
        let r = results(&games);
        assert_eq!((r.white_wins, r.black_wins, r.draws), (2, 0, 1));
        assert_eq!(r.white_win_percentage, 66.7);
        assert_eq!(r.draw_percentage, 33.3);
        assert_eq!(r.black_win_percentage, 0.0);
    }
}
