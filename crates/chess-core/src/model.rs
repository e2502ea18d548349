//! Per-game and per-move records produced by the parser.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::{Board, Color, Move, Piece, Role, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::White, Side::Black];

    pub fn from_color(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Capitalised form used in human-readable labels ("White's a1 Rook").
    pub fn label(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    /// Rank index (0-based) of this side's back rank.
    pub fn back_rank(self) -> i32 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn from_role(role: Role) -> Self {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        }
    }

    pub fn role(self) -> Role {
        match self {
            PieceKind::Pawn => Role::Pawn,
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook => Role::Rook,
            PieceKind::Queen => Role::Queen,
            PieceKind::King => Role::King,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    /// Knights, bishops, rooks and queens.
    pub fn is_minor_or_major(self) -> bool {
        !matches!(self, PieceKind::Pawn | PieceKind::King)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFlags {
    pub kingside_castle: bool,
    pub queenside_castle: bool,
    pub en_passant: bool,
    pub check: bool,
    pub checkmate: bool,
}

/// Engine evaluation attached to a move, in pawns from White's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    Pawns(f64),
    Mate(i32),
}

/// Magnitude a forced mate saturates to when mixed with pawn evaluations.
pub const MATE_PAWNS: f64 = 100.0;

impl Evaluation {
    pub fn as_pawns(self) -> f64 {
        match self {
            Evaluation::Pawns(p) => p,
            Evaluation::Mate(n) if n < 0 => -MATE_PAWNS,
            Evaluation::Mate(_) => MATE_PAWNS,
        }
    }
}

/// One ply, as certified by the rules engine during replay.
#[derive(Debug, Clone)]
pub struct MoveAnnotation {
    /// 0-based half-move index.
    pub ply: usize,
    pub color: Side,
    pub piece: PieceKind,
    pub from: Square,
    /// Destination square; for castling this is the king's destination.
    pub to: Square,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
    pub san: String,
    pub clock_seconds: Option<f64>,
    pub eval: Option<Evaluation>,
    pub mv: Move,
}

impl MoveAnnotation {
    /// ⌈(ply+1)/2⌉
    pub fn move_number_full(&self) -> usize {
        self.ply / 2 + 1
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn is_castle(&self) -> bool {
        self.flags.kingside_castle || self.flags.queenside_castle
    }

    /// True for both checks and mates.
    pub fn gives_check(&self) -> bool {
        self.flags.check || self.flags.checkmate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWin,
    #[serde(rename = "0-1")]
    BlackWin,
    #[serde(rename = "1/2-1/2")]
    Draw,
    #[serde(rename = "*")]
    Unknown,
}

impl GameResult {
    /// Movetext tokens that end a game rather than name a move.
    pub fn is_result_token(token: &str) -> bool {
        !matches!(GameResult::from_tag(token), GameResult::Unknown) || token == "*"
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "1-0" => GameResult::WhiteWin,
            "0-1" => GameResult::BlackWin,
            "1/2-1/2" | "½-½" => GameResult::Draw,
            _ => GameResult::Unknown,
        }
    }

    pub fn from_winner(side: Side) -> Self {
        match side {
            Side::White => GameResult::WhiteWin,
            Side::Black => GameResult::BlackWin,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::WhiteWin => Some(Side::White),
            GameResult::BlackWin => Some(Side::Black),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        self == GameResult::Draw
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCounts {
    pub pawns: u32,
    pub knights: u32,
    pub bishops: u32,
    pub rooks: u32,
    pub queens: u32,
    pub kings: u32,
}

impl PieceCounts {
    pub fn get(&self, kind: PieceKind) -> u32 {
        match kind {
            PieceKind::Pawn => self.pawns,
            PieceKind::Knight => self.knights,
            PieceKind::Bishop => self.bishops,
            PieceKind::Rook => self.rooks,
            PieceKind::Queen => self.queens,
            PieceKind::King => self.kings,
        }
    }

    fn slot(&mut self, kind: PieceKind) -> &mut u32 {
        match kind {
            PieceKind::Pawn => &mut self.pawns,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Queen => &mut self.queens,
            PieceKind::King => &mut self.kings,
        }
    }
}

/// Material left on the board at the last recorded position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCensus {
    pub white: PieceCounts,
    pub black: PieceCounts,
}

impl PieceCensus {
    pub fn from_board(board: &Board) -> Self {
        let mut census = PieceCensus::default();
        for side in Side::BOTH {
            for kind in PieceKind::ALL {
                let count = board
                    .by_piece(Piece {
                        color: side.color(),
                        role: kind.role(),
                    })
                    .count() as u32;
                *census.side_mut(side).slot(kind) = count;
            }
        }
        census
    }

    pub fn side(&self, side: Side) -> &PieceCounts {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut PieceCounts {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    pub fn total(&self, kind: PieceKind) -> u32 {
        self.white.get(kind) + self.black.get(kind)
    }
}

/// Tallies of the special move kinds in one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialMoves {
    pub kingside_castles: u32,
    pub queenside_castles: u32,
    pub en_passant: u32,
    pub promotions: u32,
    pub checks: u32,
    pub checkmates: u32,
}

/// One game's reconstructed record. Never mutated after parsing.
#[derive(Debug, Clone)]
pub struct ParsedGame {
    /// Position within the round's game list, failed games included.
    pub index: usize,
    pub headers: BTreeMap<String, String>,
    pub moves: Vec<MoveAnnotation>,
    pub result: GameResult,
    pub final_census: PieceCensus,
    /// Comment- and variation-free copy of the game text.
    pub pgn: String,
    /// The game exactly as it appeared in the input.
    pub raw_pgn: String,
}

impl ParsedGame {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn white(&self) -> &str {
        self.header("White").unwrap_or("Unknown")
    }

    pub fn black(&self) -> &str {
        self.header("Black").unwrap_or("Unknown")
    }

    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::White => self.white(),
            Side::Black => self.black(),
        }
    }

    /// `GameId` header, falling back to the last path segment of `Site`.
    pub fn game_id(&self) -> Option<String> {
        if let Some(id) = self.header("GameId") {
            return Some(id.to_string());
        }
        self.header("Site")
            .and_then(|site| site.trim_end_matches('/').rsplit('/').next())
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    pub fn has_moves(&self) -> bool {
        !self.moves.is_empty()
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Length in full moves, ⌈plies/2⌉.
    pub fn full_moves(&self) -> usize {
        self.moves.len().div_ceil(2)
    }

    /// `(base, increment)` in seconds from a `TimeControl` header like `5400+30`.
    pub fn time_control(&self) -> Option<(u32, u32)> {
        let tc = self.header("TimeControl")?;
        let (base, inc) = match tc.split_once('+') {
            Some((b, i)) => (b, i),
            None => (tc, "0"),
        };
        Some((base.trim().parse().ok()?, inc.trim().parse().ok()?))
    }

    /// SAN of the first `plies` moves.
    pub fn opening_sequence(&self, plies: usize) -> Vec<&str> {
        self.moves.iter().take(plies).map(|m| m.san.as_str()).collect()
    }

    pub fn special_moves(&self) -> SpecialMoves {
        let mut special = SpecialMoves::default();
        for m in &self.moves {
            if m.flags.kingside_castle {
                special.kingside_castles += 1;
            }
            if m.flags.queenside_castle {
                special.queenside_castles += 1;
            }
            if m.flags.en_passant {
                special.en_passant += 1;
            }
            if m.promotion.is_some() {
                special.promotions += 1;
            }
            if m.flags.checkmate {
                special.checkmates += 1;
            } else if m.flags.check {
                special.checks += 1;
            }
        }
        special
    }
}

/// The move-bearing subset every move-based statistic runs over.
pub fn with_moves(games: &[ParsedGame]) -> Vec<&ParsedGame> {
    games.iter().filter(|g| g.has_moves()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_round_trips_through_tag() {
        for tag in ["1-0", "0-1", "1/2-1/2", "*"] {
            assert_eq!(GameResult::from_tag(tag).as_str(), tag);
        }
        assert_eq!(GameResult::from_tag("garbage"), GameResult::Unknown);
        assert_eq!(
            serde_json::to_string(&GameResult::Draw).unwrap(),
            "\"1/2-1/2\""
        );
    }

    #[test]
    fn test_mate_saturates() {
        assert_eq!(Evaluation::Mate(3).as_pawns(), 100.0);
        assert_eq!(Evaluation::Mate(-1).as_pawns(), -100.0);
        assert_eq!(Evaluation::Pawns(-2.5).as_pawns(), -2.5);
    }

    #[test]
    fn test_census_of_start_position() {
        let census = PieceCensus::from_board(&Board::default());
        assert_eq!(census.white.pawns, 8);
        assert_eq!(census.black.knights, 2);
        assert_eq!(census.total(PieceKind::Queen), 2);
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Black).unwrap(), "\"black\"");
        assert_eq!(Side::White.opposite(), Side::Black);
    }
}
