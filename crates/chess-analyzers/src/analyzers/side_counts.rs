//! Detectors that count one kind of move per side and keep the round's
//! highest count.

use chess_core::{ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};
use shakmaty::Square;

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{GameRef, SideTally};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovesRecord {
    pub moves: u32,
    pub color: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRecord {
    pub distance: u32,
    pub color: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturesRecord {
    pub captures: u32,
    pub color: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetreatsRecord {
    pub retreats: u32,
    pub color: Side,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Sums `weight` over each side's moves; the record goes to the largest
/// non-zero per-side total.
pub struct SideCountAnalyzer<R> {
    name: &'static str,
    weight: fn(&MoveContext) -> u32,
    build: fn(u32, Side, GameRef) -> R,
    tally: SideTally,
}

impl<R> SideCountAnalyzer<R> {
    pub fn new(
        name: &'static str,
        weight: fn(&MoveContext) -> u32,
        build: fn(u32, Side, GameRef) -> R,
    ) -> Self {
        Self {
            name,
            weight,
            build,
            tally: SideTally::default(),
        }
    }
}

impl<R> GameAnalyzer for SideCountAnalyzer<R> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.tally.reset();
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        let n = (self.weight)(ctx);
        if n > 0 {
            self.tally.add(ctx.mv.color, n);
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        self.tally.finish(game);
    }
}

impl<R> Superlative for SideCountAnalyzer<R> {
    type Record = R;

    fn into_record(self) -> Option<R> {
        let build = self.build;
        self.tally
            .into_best()
            .map(|(count, side, game)| build(count, side, game))
    }
}

fn is_dark(sq: Square) -> bool {
    (sq.file() as u32 + sq.rank() as u32) % 2 == 0
}

fn is_edge_file(sq: Square) -> bool {
    matches!(sq.file() as u32, 0 | 7)
}

fn deltas(ctx: &MoveContext) -> (u32, u32) {
    let df = (ctx.mv.to.file() as i32 - ctx.mv.from.file() as i32).unsigned_abs();
    let dr = (ctx.mv.to.rank() as i32 - ctx.mv.from.rank() as i32).unsigned_abs();
    (df, dr)
}

fn moves(moves: u32, color: Side, game: GameRef) -> MovesRecord {
    MovesRecord { moves, color, game }
}

fn captures(captures: u32, color: Side, game: GameRef) -> CapturesRecord {
    CapturesRecord {
        captures,
        color,
        game,
    }
}

/// King moves, castling included.
pub fn dadbod_shuffler() -> SideCountAnalyzer<MovesRecord> {
    SideCountAnalyzer::new(
        "dadbod_shuffler",
        |ctx| u32::from(ctx.mv.piece == PieceKind::King),
        moves,
    )
}

/// Manhattan distance covered by queens.
pub fn sporty_queen() -> SideCountAnalyzer<DistanceRecord> {
    SideCountAnalyzer::new(
        "sporty_queen",
        |ctx| {
            if ctx.mv.piece != PieceKind::Queen {
                return 0;
            }
            let (df, dr) = deltas(ctx);
            df + dr
        },
        |distance, color, game| DistanceRecord {
            distance,
            color,
            game,
        },
    )
}

/// Moves starting or ending on the a- or h-file.
pub fn edge_lord() -> SideCountAnalyzer<MovesRecord> {
    SideCountAnalyzer::new(
        "edge_lord",
        |ctx| u32::from(is_edge_file(ctx.mv.from) || is_edge_file(ctx.mv.to)),
        moves,
    )
}

pub fn dark_lord() -> SideCountAnalyzer<CapturesRecord> {
    SideCountAnalyzer::new(
        "dark_lord",
        |ctx| u32::from(ctx.mv.is_capture() && is_dark(ctx.mv.to)),
        captures,
    )
}

pub fn sunglasses() -> SideCountAnalyzer<CapturesRecord> {
    SideCountAnalyzer::new(
        "sunglasses",
        |ctx| u32::from(ctx.mv.is_capture() && !is_dark(ctx.mv.to)),
        captures,
    )
}

/// Non-castling moves back toward the mover's own side of the board.
pub fn chicken_award() -> SideCountAnalyzer<RetreatsRecord> {
    SideCountAnalyzer::new(
        "chicken_award",
        |ctx| {
            if ctx.mv.is_castle() {
                return 0;
            }
            let (from, to) = (ctx.mv.from.rank() as i32, ctx.mv.to.rank() as i32);
            let retreat = match ctx.mv.color {
                Side::White => to < from,
                Side::Black => to > from,
            };
            u32::from(retreat)
        },
        |retreats, color, game| RetreatsRecord {
            retreats,
            color,
            game,
        },
    )
}

pub fn pawn_captures() -> SideCountAnalyzer<CapturesRecord> {
    SideCountAnalyzer::new(
        "pawn_captures",
        |ctx| u32::from(ctx.mv.piece == PieceKind::Pawn && ctx.mv.is_capture()),
        captures,
    )
}

/// Diagonal bishop and queen moves.
pub fn anti_orthogonal() -> SideCountAnalyzer<MovesRecord> {
    SideCountAnalyzer::new(
        "anti_orthogonal",
        |ctx| {
            if !matches!(ctx.mv.piece, PieceKind::Bishop | PieceKind::Queen) {
                return 0;
            }
            let (df, dr) = deltas(ctx);
            u32::from(df == dr && df > 0)
        },
        moves,
    )
}
