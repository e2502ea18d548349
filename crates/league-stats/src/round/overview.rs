use chess_analyzers::records::Extremum;
use chess_analyzers::GameRef;
use chess_core::{GameResult, ParsedGame};
use serde::{Deserialize, Serialize};

use crate::round1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLength {
    /// Full moves, ⌈plies/2⌉.
    pub moves: usize,
    pub result: GameResult,
    #[serde(flatten)]
    pub game: GameRef,
}

impl GameLength {
    fn of(game: &ParsedGame) -> Self {
        Self {
            moves: game.full_moves(),
            result: game.result,
            game: GameRef::of(game),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Every game in the file, forfeits and unparseable games included.
    pub total_games: usize,
    pub games_with_moves: usize,
    /// Plies across all games with moves.
    pub total_moves: usize,
    /// Full moves per game with moves.
    pub average_game_length: f64,
    pub longest_game: Option<GameLength>,
    pub shortest_game: Option<GameLength>,
}

pub fn overview(total_games: usize, played: &[&ParsedGame]) -> Overview {
    let total_moves: usize = played.iter().map(|g| g.ply_count()).sum();
    let average_game_length = if played.is_empty() {
        0.0
    } else {
        round1(total_moves as f64 / played.len() as f64 / 2.0)
    };

    let mut longest = Extremum::max();
    let mut shortest = Extremum::min();
    for game in played {
        let plies = game.ply_count();
        longest.offer(plies, || GameLength::of(game));
        shortest.offer(plies, || GameLength::of(game));
    }

    Overview {
        total_games,
        games_with_moves: played.len(),
        total_moves,
        average_game_length,
        longest_game: longest.into_record(),
        shortest_game: shortest.into_record(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_lengths_and_average() {
        let a = parse_game(0, "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *").unwrap();
        let b = parse_game(1, "1. d4 d5 2. c4 *").unwrap();
        let c = parse_game(2, "1. c4 e5 2. Nc3 Nf6 3. g3 d5 *").unwrap();
        let o = overview(4, &[&a, &b, &c]);

        assert_eq!(o.total_games, 4);
        assert_eq!(o.games_with_moves, 3);
        assert_eq!(o.total_moves, 15);
        assert_eq!(o.average_game_length, 2.5);

        let longest = o.longest_game.unwrap();
        assert_eq!(longest.moves, 3);
        assert_eq!(longest.game.game_index, 0);
        let shortest = o.shortest_game.unwrap();
        assert_eq!(shortest.moves, 2);
        assert_eq!(shortest.game.game_index, 1);
    }

    #[test]
    fn test_no_games_with_moves() {
        let o = overview(2, &[]);
        assert_eq!(o.average_game_length, 0.0);
        assert!(o.longest_game.is_none());
        assert!(o.shortest_game.is_none());
    }
}
