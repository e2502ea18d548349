//! Whole-game awards: the round's goriest, gentlest, quickest and most
//! drawn-out games.

use chess_analyzers::records::Extremum;
use chess_analyzers::{GameRef, PhaseSpan};
use chess_core::{ParsedGame, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturesAward {
    pub captures: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedDemon {
    pub moves: usize,
    pub winner: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndgameWizard {
    pub endgame_moves: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningSprinter {
    pub opening_moves: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundAwards {
    pub bloodbath: Option<CapturesAward>,
    pub pacifist: Option<CapturesAward>,
    /// Fastest checkmate.
    pub speed_demon: Option<SpeedDemon>,
    pub endgame_wizard: Option<EndgameWizard>,
    /// Shortest non-empty opening phase.
    pub opening_sprinter: Option<OpeningSprinter>,
}

pub fn round_awards(played: &[(&ParsedGame, PhaseSpan)]) -> RoundAwards {
    let mut bloodbath = Extremum::max();
    let mut pacifist = Extremum::min();
    let mut speed_demon = Extremum::min();
    let mut wizard = Extremum::max();
    let mut sprinter = Extremum::min();

    for (game, span) in played {
        let captures = game.moves.iter().filter(|m| m.is_capture()).count();
        let award = || CapturesAward {
            captures,
            game: GameRef::of(game),
        };
        bloodbath.offer(captures, award);
        pacifist.offer(captures, award);

        if let Some(last) = game.moves.last().filter(|m| m.flags.checkmate) {
            let moves = last.move_number_full();
            speed_demon.offer(moves, || SpeedDemon {
                moves,
                winner: last.color,
                game: GameRef::of(game),
            });
        }

        let endgame_moves = span.endgame_moves();
        if endgame_moves > 0 {
            wizard.offer(endgame_moves, || EndgameWizard {
                endgame_moves,
                game: GameRef::of(game),
            });
        }
        let opening_moves = span.opening_moves();
        if opening_moves > 0 {
            sprinter.offer(opening_moves, || OpeningSprinter {
                opening_moves,
                game: GameRef::of(game),
            });
        }
    }

    RoundAwards {
        bloodbath: bloodbath.into_record(),
        pacifist: pacifist.into_record(),
        speed_demon: speed_demon.into_record(),
        endgame_wizard: wizard.into_record(),
        opening_sprinter: sprinter.into_record(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analyzers::detect_phases;
    use chess_core::parse_game;

    #[test]
    fn test_awards_pick_extremes() {
        let sharp = parse_game(0, "1. e4 d5 2. exd5 Qxd5 3. Nc3 Qxg2 4. Bxg2 *").unwrap();
        let mate = parse_game(1, "1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0").unwrap();
        let played = [
            (&sharp, detect_phases(&sharp)),
            (&mate, detect_phases(&mate)),
        ];
        let awards = round_awards(&played);

        assert_eq!(awards.bloodbath.unwrap().captures, 4);
        let pacifist = awards.pacifist.unwrap();
        assert_eq!(pacifist.captures, 1);
        assert_eq!(pacifist.game.game_index, 1);

        let demon = awards.speed_demon.unwrap();
        assert_eq!(demon.moves, 4);
        assert_eq!(demon.winner, Side::White);
        assert!(awards.endgame_wizard.is_none());
        assert!(awards.opening_sprinter.is_some());
    }
}
