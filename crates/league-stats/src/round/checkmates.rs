use chess_analyzers::records::Extremum;
use chess_analyzers::GameRef;
use chess_core::{ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};

/// Mates by the piece that delivered the final move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatesByPiece {
    pub queen: u32,
    pub rook: u32,
    pub bishop: u32,
    pub knight: u32,
    pub pawn: u32,
    pub king: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastestMate {
    pub moves: usize,
    pub winner: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkmates {
    pub by_piece: MatesByPiece,
    pub fastest: Option<FastestMate>,
}

pub fn checkmates(played: &[&ParsedGame]) -> Checkmates {
    let mut out = Checkmates::default();
    let mut fastest = Extremum::min();

    for game in played {
        let Some(last) = game.moves.last().filter(|m| m.flags.checkmate) else {
            continue;
        };
        let slot = match last.piece {
            PieceKind::Queen => &mut out.by_piece.queen,
            PieceKind::Rook => &mut out.by_piece.rook,
            PieceKind::Bishop => &mut out.by_piece.bishop,
            PieceKind::Knight => &mut out.by_piece.knight,
            PieceKind::Pawn => &mut out.by_piece.pawn,
            PieceKind::King => &mut out.by_piece.king,
        };
        *slot += 1;

        let moves = last.move_number_full();
        fastest.offer(moves, || FastestMate {
            moves,
            winner: last.color,
            game: GameRef::of(game),
        });
    }

    out.fastest = fastest.into_record();
    out
}
