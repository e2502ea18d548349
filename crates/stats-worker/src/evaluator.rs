//! Position scoring seam between the analysis and the engine process.

use std::future::Future;

use crate::error::WorkerError;

/// Centipawns given to a mate in one; each further move costs ten.
pub const MATE_SCORE: i32 = 10_000;

/// An engine verdict from White's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Centipawns, with mates folded in as ±(10000 − 10·N).
    pub cp: i32,
    /// Signed moves to mate when the engine sees one; positive means White mates.
    pub mate: Option<i32>,
}

impl Score {
    pub fn cp(cp: i32) -> Self {
        Self { cp, mate: None }
    }

    /// Mate in `moves` for White (`moves > 0`) or Black (`moves < 0`).
    pub fn mate(moves: i32) -> Self {
        let value = MATE_SCORE - 10 * moves.abs();
        Self {
            cp: if moves < 0 { -value } else { value },
            mate: Some(moves),
        }
    }

    /// The side to move is checkmated.
    pub fn mated(white_to_move: bool) -> Self {
        Self {
            cp: if white_to_move { -MATE_SCORE } else { MATE_SCORE },
            mate: Some(0),
        }
    }

    /// Convert an engine report relative to the side to move.
    pub fn from_engine(cp: Option<i32>, mate: Option<i32>, white_to_move: bool) -> Self {
        let flip = |v: i32| if white_to_move { v } else { -v };
        match (mate, cp) {
            (Some(0), _) => Self::mated(white_to_move),
            (Some(m), _) => Self::mate(flip(m)),
            (None, Some(c)) => Self::cp(flip(c)),
            (None, None) => Self::cp(0),
        }
    }

    pub fn is_mate(&self) -> bool {
        self.mate.is_some()
    }

    /// `M3`, `M-2`, or the centipawn value.
    pub fn label(&self) -> String {
        match self.mate {
            Some(m) => format!("M{m}"),
            None => self.cp.to_string(),
        }
    }
}

/// Anything that can score a FEN position.
pub trait Evaluator: Send {
    fn evaluate(&mut self, fen: &str) -> impl Future<Output = Result<Score, WorkerError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_scores() {
        assert_eq!(Score::mate(3).cp, 9970);
        assert_eq!(Score::mate(-2).cp, -9980);
        assert_eq!(Score::mate(-2).label(), "M-2");
        assert_eq!(Score::cp(-45).label(), "-45");
    }

    #[test]
    fn test_engine_perspective_flipped_for_black() {
        assert_eq!(Score::from_engine(Some(120), None, false), Score::cp(-120));
        assert_eq!(Score::from_engine(None, Some(2), false), Score::mate(-2));
        assert_eq!(Score::from_engine(None, Some(0), true).cp, -MATE_SCORE);
        assert_eq!(Score::from_engine(None, Some(0), false).cp, MATE_SCORE);
    }
}
