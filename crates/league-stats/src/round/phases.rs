use chess_analyzers::records::Extremum;
use chess_analyzers::{GameRef, PhaseSpan};
use chess_core::ParsedGame;
use serde::{Deserialize, Serialize};

use crate::round1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRecord {
    pub moves: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePhases {
    pub average_opening_length: f64,
    pub average_middlegame_length: f64,
    pub average_endgame_length: f64,
    /// Moves played before the first capture (the whole game if none).
    pub longest_wait_till_capture: Option<PhaseRecord>,
    pub longest_middlegame: Option<PhaseRecord>,
    pub longest_endgame: Option<PhaseRecord>,
}

fn plies_before_first_capture(game: &ParsedGame) -> usize {
    game.moves
        .iter()
        .position(|m| m.is_capture())
        .unwrap_or(game.moves.len())
}

/// Offer `moves` to `best` unless it is zero.
fn offer_nonzero(best: &mut Extremum<usize, PhaseRecord>, moves: usize, game: &ParsedGame) {
    if moves > 0 {
        best.offer(moves, || PhaseRecord {
            moves,
            game: GameRef::of(game),
        });
    }
}

pub fn game_phases(played: &[(&ParsedGame, PhaseSpan)]) -> GamePhases {
    if played.is_empty() {
        return GamePhases::default();
    }

    let mut opening = 0;
    let mut middlegame = 0;
    let mut endgame = 0;
    let mut wait = Extremum::max();
    let mut longest_middlegame = Extremum::max();
    let mut longest_endgame = Extremum::max();

    for (game, span) in played {
        opening += span.opening_plies();
        middlegame += span.middlegame_plies();
        endgame += span.endgame_plies();

        offer_nonzero(&mut wait, plies_before_first_capture(game).div_ceil(2), game);
        offer_nonzero(&mut longest_middlegame, span.middlegame_moves(), game);
        offer_nonzero(&mut longest_endgame, span.endgame_moves(), game);
    }

    let n = played.len() as f64;
    GamePhases {
        average_opening_length: round1(opening as f64 / n / 2.0),
        average_middlegame_length: round1(middlegame as f64 / n / 2.0),
        average_endgame_length: round1(endgame as f64 / n / 2.0),
        longest_wait_till_capture: wait.into_record(),
        longest_middlegame: longest_middlegame.into_record(),
        longest_endgame: longest_endgame.into_record(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analyzers::detect_phases;
    use chess_core::parse_game;

    #[test]
    fn test_wait_till_capture() {
        let quiet = parse_game(0, "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 *").unwrap();
        let sharp = parse_game(1, "1. e4 d5 2. exd5 Qxd5 *").unwrap();
        let spans = [
            (&quiet, detect_phases(&quiet)),
            (&sharp, detect_phases(&sharp)),
        ];
        let phases = game_phases(&spans);
        let wait = phases.longest_wait_till_capture.unwrap();
        assert_eq!(wait.moves, 3);
        assert_eq!(wait.game.game_index, 0);
        assert!(phases.longest_endgame.is_none());
    }

    #[test]
    fn test_averages_in_full_moves() {
        let game = parse_game(
            0,
            "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 O-O 6. c3 d6 *",
        )
        .unwrap();
        let span = detect_phases(&game);
        let phases = game_phases(&[(&game, span)]);
        assert_eq!(phases.average_opening_length, 4.5);
        assert_eq!(phases.average_middlegame_length, 1.5);
        assert_eq!(phases.longest_middlegame.unwrap().moves, 2);
    }
}
