//! Opening / middlegame / endgame boundaries from minor and major piece counts.

use chess_core::{ParsedGame, Side};
use serde::{Deserialize, Serialize};
use shakmaty::{Board, Chess, Position, Role};

/// Opening ends once this many plies have been played.
const OPENING_PLY_LIMIT: usize = 20;
const OPENING_PIECE_LIMIT: u32 = 10;
const ENDGAME_PIECE_LIMIT: u32 = 6;
const OPENING_FALLBACK: usize = 15;

/// Ply boundaries of one game's phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSpan {
    pub opening_end_ply: usize,
    pub endgame_start_ply: usize,
    pub total_plies: usize,
}

impl PhaseSpan {
    pub fn opening_plies(&self) -> usize {
        self.opening_end_ply
    }

    pub fn middlegame_plies(&self) -> usize {
        self.endgame_start_ply.saturating_sub(self.opening_end_ply)
    }

    /// Plies after the later of the two boundaries, so the three phases
    /// never overlap.
    pub fn endgame_plies(&self) -> usize {
        self.total_plies
            .saturating_sub(self.opening_end_ply.max(self.endgame_start_ply))
    }

    pub fn opening_moves(&self) -> usize {
        self.opening_plies().div_ceil(2)
    }

    pub fn middlegame_moves(&self) -> usize {
        self.middlegame_plies().div_ceil(2)
    }

    pub fn endgame_moves(&self) -> usize {
        self.endgame_plies().div_ceil(2)
    }
}

/// Knights, bishops, rooks and queens of both colours.
pub fn minor_major_count(board: &Board) -> u32 {
    let kings_and_pawns = board.by_role(Role::King) | board.by_role(Role::Pawn);
    (board.occupied() & !kings_and_pawns).count() as u32
}

/// Piece counts after each ply.
fn counts_after_each_ply(game: &ParsedGame) -> Vec<u32> {
    let mut pos = Chess::default();
    game.moves
        .iter()
        .map(|m| {
            pos.play_unchecked(m.mv);
            minor_major_count(pos.board())
        })
        .collect()
}

pub fn detect_phases(game: &ParsedGame) -> PhaseSpan {
    let total = game.moves.len();
    if total == 0 {
        return PhaseSpan::default();
    }
    let counts = counts_after_each_ply(game);
    PhaseSpan {
        opening_end_ply: opening_end(game, &counts),
        endgame_start_ply: endgame_start(&counts),
        total_plies: total,
    }
}

fn opening_end(game: &ParsedGame, counts: &[u32]) -> usize {
    let mut castled = [false; 2];
    for (i, m) in game.moves.iter().enumerate() {
        if m.is_castle() {
            castled[m.color as usize] = true;
        }
        let both_castled = castled[Side::White as usize] && castled[Side::Black as usize];
        if both_castled || i >= OPENING_PLY_LIMIT || counts[i] <= OPENING_PIECE_LIMIT {
            return i;
        }
    }
    OPENING_FALLBACK.min(counts.len())
}

/// One ply past the last position holding more than six pieces.
fn endgame_start(counts: &[u32]) -> usize {
    counts
        .iter()
        .rposition(|&c| c > ENDGAME_PIECE_LIMIT)
        .map_or(0, |last| last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_short_game_uses_fallback() {
        let game = parse_game(0, "1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0").unwrap();
        let span = detect_phases(&game);
        assert_eq!(span.opening_end_ply, 7);
        assert_eq!(span.endgame_start_ply, 7);
        assert_eq!(span.middlegame_plies(), 0);
        assert_eq!(span.endgame_plies(), 0);
    }

    #[test]
    fn test_opening_ends_when_both_castle() {
        let game = parse_game(
            0,
            "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 O-O 6. c3 d6 *",
        )
        .unwrap();
        let span = detect_phases(&game);
        assert_eq!(span.opening_end_ply, 9);
        assert_eq!(span.endgame_start_ply, 12);
        assert_eq!(span.total_plies, 12);
    }

    #[test]
    fn test_forfeit_has_empty_span() {
        let game = parse_game(0, "[White \"A\"]\n[Black \"B\"]\n[Result \"1-0\"]\n\n1-0").unwrap();
        assert_eq!(detect_phases(&game), PhaseSpan::default());
    }

    #[test]
    fn test_endgame_start_after_last_crowded_position() {
        assert_eq!(endgame_start(&[14, 12, 7, 6, 7, 5]), 5);
        assert_eq!(endgame_start(&[6, 5, 4]), 0);
        assert_eq!(endgame_start(&[14, 14]), 2);
    }

    #[test]
    fn test_phase_moves_sum_close_to_total() {
        let span = PhaseSpan {
            opening_end_ply: 20,
            endgame_start_ply: 61,
            total_plies: 80,
        };
        let sum = span.opening_moves() + span.middlegame_moves() + span.endgame_moves();
        assert!(sum.abs_diff(40) <= 1);
    }
}
