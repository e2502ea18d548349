use chess_analyzers::records::Extremum;
use chess_analyzers::GameRef;
use chess_core::{ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingCounts {
    pub kingside: u32,
    pub queenside: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnPassantGame {
    pub count: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureCount {
    pub captures: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonCaptureStreak {
    /// Consecutive plies without a capture.
    pub moves: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Underpromotion {
    pub move_number: usize,
    pub promoted_to: PieceKind,
    pub color: Side,
    #[serde(rename = "move")]
    pub san: String,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tactics {
    pub total_captures: usize,
    pub en_passant_games: Vec<EnPassantGame>,
    pub promotions: u32,
    pub castling: CastlingCounts,
    pub bloodiest_game: Option<CaptureCount>,
    pub quietest_game: Option<CaptureCount>,
    pub longest_non_capture_streak: Option<NonCaptureStreak>,
    pub total_underpromotions: usize,
    pub underpromotions: Vec<Underpromotion>,
    /// Checking moves, mates included.
    pub total_checks: u32,
}

fn longest_quiet_run(game: &ParsedGame) -> usize {
    let mut best = 0;
    let mut run = 0;
    for m in &game.moves {
        if m.is_capture() {
            run = 0;
        } else {
            run += 1;
            best = best.max(run);
        }
    }
    best
}

pub fn tactics(played: &[&ParsedGame]) -> Tactics {
    let mut out = Tactics::default();
    let mut bloodiest = Extremum::max();
    let mut quietest = Extremum::min();
    let mut streak = Extremum::max();

    for game in played {
        let special = game.special_moves();
        out.promotions += special.promotions;
        out.castling.kingside += special.kingside_castles;
        out.castling.queenside += special.queenside_castles;
        out.total_checks += special.checks + special.checkmates;
        if special.en_passant > 0 {
            out.en_passant_games.push(EnPassantGame {
                count: special.en_passant,
                game: GameRef::of(game),
            });
        }

        let captures = game.moves.iter().filter(|m| m.is_capture()).count();
        out.total_captures += captures;
        let record = || CaptureCount {
            captures,
            game: GameRef::of(game),
        };
        bloodiest.offer(captures, record);
        quietest.offer(captures, record);

        let quiet = longest_quiet_run(game);
        streak.offer(quiet, || NonCaptureStreak {
            moves: quiet,
            game: GameRef::of(game),
        });

        for m in &game.moves {
            if let Some(kind) = m.promotion.filter(|k| *k != PieceKind::Queen) {
                out.underpromotions.push(Underpromotion {
                    move_number: m.move_number_full(),
                    promoted_to: kind,
                    color: m.color,
                    san: m.san.clone(),
                    game: GameRef::of(game),
                });
            }
        }
    }

    out.total_underpromotions = out.underpromotions.len();
    out.bloodiest_game = bloodiest.into_record();
    out.quietest_game = quietest.into_record();
    out.longest_non_capture_streak = streak.into_record();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_capture_extremes() {
        let a = parse_game(0, "1. e4 d5 2. exd5 Qxd5 3. Nc3 Qa5 *").unwrap();
        let b = parse_game(1, "1. e4 e5 2. Nf3 Nc6 *").unwrap();
        let t = tactics(&[&a, &b]);
        assert_eq!(t.total_captures, 2);
        assert_eq!(t.bloodiest_game.unwrap().game.game_index, 0);
        let quiet = t.quietest_game.unwrap();
        assert_eq!(quiet.captures, 0);
        assert_eq!(quiet.game.game_index, 1);
        assert_eq!(t.longest_non_capture_streak.unwrap().moves, 4);
    }

    #[test]
    fn test_en_passant_and_underpromotion() {
        let ep = parse_game(0, "1. e4 a6 2. e5 d5 3. exd6 e6 *").unwrap();
        let under = parse_game(
            1,
            "1. h4 g5 2. hxg5 h6 3. gxh6 Nf6 4. h7 Ng8 5. hxg8=N Rxh1 *",
        )
        .unwrap();
        let t = tactics(&[&ep, &under]);
        assert_eq!(t.en_passant_games.len(), 1);
        assert_eq!(t.en_passant_games[0].count, 1);
        assert_eq!(t.promotions, 1);
        assert_eq!(t.total_underpromotions, 1);
        let u = &t.underpromotions[0];
        assert_eq!(u.promoted_to, PieceKind::Knight);
        assert_eq!(u.move_number, 5);
        assert_eq!(u.color, Side::White);
        assert_eq!(u.san, "hxg8=N");
    }

    #[test]
    fn test_checks_include_mates() {
        let mate = parse_game(0, "1. f3 e5 2. g4 Qh4# 0-1").unwrap();
        let t = tactics(&[&mate]);
        assert_eq!(t.total_checks, 1);
    }
}
