//! Piece identities followed across a game, keyed by starting square.

use chess_core::{MoveAnnotation, PieceKind, Side};
use shakmaty::{Board, Move, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedPiece {
    pub side: Side,
    /// Kind at the start of the game; promotions keep the pawn's identity.
    pub kind: PieceKind,
    pub start: Square,
}

impl TrackedPiece {
    /// "White's a1 Rook"
    pub fn label(&self) -> String {
        format!("{}'s {} {}", self.side.label(), self.start, self.kind.title())
    }
}

#[derive(Debug, Clone)]
pub struct PieceTracker {
    pieces: Vec<TrackedPiece>,
    squares: [Option<usize>; 64],
}

impl Default for PieceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceTracker {
    /// Standard starting layout.
    pub fn new() -> Self {
        let board = Board::default();
        let mut tracker = Self {
            pieces: Vec::with_capacity(32),
            squares: [None; 64],
        };
        for sq in Square::ALL {
            if let Some(piece) = board.piece_at(sq) {
                tracker.register(sq, Side::from_color(piece.color), PieceKind::from_role(piece.role));
            }
        }
        tracker
    }

    fn register(&mut self, sq: Square, side: Side, kind: PieceKind) -> usize {
        let id = self.pieces.len();
        self.pieces.push(TrackedPiece {
            side,
            kind,
            start: sq,
        });
        self.squares[sq as usize] = Some(id);
        id
    }

    pub fn at(&self, sq: Square) -> Option<usize> {
        self.squares[sq as usize]
    }

    pub fn piece(&self, id: usize) -> &TrackedPiece {
        &self.pieces[id]
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Move the pieces touched by `m` and return the mover's id.
    pub fn apply(&mut self, m: &MoveAnnotation) -> usize {
        let mover = match self.at(m.from) {
            Some(id) => id,
            None => self.register(m.from, m.color, m.piece),
        };

        if m.flags.en_passant {
            let victim = Square::new(m.from.rank() as u32 * 8 + m.to.file() as u32);
            self.squares[victim as usize] = None;
        }

        self.squares[m.from as usize] = None;
        self.squares[m.to as usize] = Some(mover);

        if let Move::Castle { rook, .. } = m.mv {
            if let Some(side) = m.mv.castling_side() {
                let rook_id = self.squares[rook as usize].take();
                self.squares[side.rook_to(m.color.color()) as usize] = rook_id;
            }
        }
        mover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_castling_moves_rook_identity() {
        let game = parse_game(0, "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O *").unwrap();
        let mut tracker = PieceTracker::new();
        for m in &game.moves {
            tracker.apply(m);
        }
        let f1 = tracker.at(Square::F1).unwrap();
        assert_eq!(tracker.piece(f1).label(), "White's h1 Rook");
        let g1 = tracker.at(Square::G1).unwrap();
        assert_eq!(tracker.piece(g1).kind, PieceKind::King);
        assert!(tracker.at(Square::H1).is_none());
    }

    #[test]
    fn test_capture_replaces_occupant() {
        let game = parse_game(0, "1. e4 d5 2. exd5 *").unwrap();
        let mut tracker = PieceTracker::new();
        for m in &game.moves {
            tracker.apply(m);
        }
        let d5 = tracker.at(Square::D5).unwrap();
        assert_eq!(tracker.piece(d5).start, Square::E2);
        assert!(tracker.at(Square::E2).is_none());
        assert_eq!(tracker.len(), 32);
    }
}
