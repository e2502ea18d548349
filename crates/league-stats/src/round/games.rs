use chess_analyzers::{lookup_opening, GameRef};
use chess_core::{GameResult, ParsedGame};
use serde::{Deserialize, Serialize};

/// Plies searched for a named opening.
const OPENING_PLIES: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningName {
    pub eco: String,
    pub name: String,
}

/// One line per parsed game, forfeits included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(flatten)]
    pub game: GameRef,
    pub result: GameResult,
    /// Full moves; 0 for a forfeit.
    pub moves: usize,
    pub opening: Option<OpeningName>,
}

pub fn game_summaries(games: &[ParsedGame]) -> Vec<GameSummary> {
    games
        .iter()
        .map(|game| GameSummary {
            game: GameRef::of(game),
            result: game.result,
            moves: game.full_moves(),
            opening: lookup_opening(&game.opening_sequence(OPENING_PLIES)).map(|o| OpeningName {
                eco: o.eco.to_string(),
                name: o.name.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_summaries_cover_forfeits() {
        let games = vec![
            parse_game(0, "[White \"A\"]\n[Black \"B\"]\n\n1. e4 c5 2. Nf3 d6 3. d4 cxd4 *")
                .unwrap(),
            parse_game(1, "[White \"C\"]\n[Black \"D\"]\n[Result \"0-1\"]\n\n0-1").unwrap(),
        ];
        let list = game_summaries(&games);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].moves, 3);
        assert_eq!(list[0].opening.as_ref().unwrap().eco, "B50");
        assert_eq!(list[1].moves, 0);
        assert_eq!(list[1].result, GameResult::BlackWin);
        assert!(list[1].opening.is_none());
    }
}
