use chess_core::{ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};
use shakmaty::{Position, Square};

use crate::analyzer_trait::{GameAnalyzer, MoveContext, Superlative};
use crate::records::{Extremum, GameRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomebodyRecord {
    pub player: Side,
    pub player_name: String,
    /// Distinct piece types that ever stood in the opponent's half.
    pub pieces_in_enemy: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvasionRecord {
    pub player: Side,
    pub player_name: String,
    /// Full move of the first crossing into the opponent's half.
    pub move_number: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerritoryAwards {
    pub homebody: Option<HomebodyRecord>,
    pub late_bloomer: Option<InvasionRecord>,
    pub quick_draw: Option<InvasionRecord>,
}

fn in_enemy_half(side: Side, sq: Square) -> bool {
    match side {
        Side::White => sq.rank() as u32 >= 4,
        Side::Black => (sq.rank() as u32) <= 3,
    }
}

/// Who crossed the middle of the board, when, and with how many piece types.
pub struct EnemyTerritoryAnalyzer {
    homebody: Extremum<u32, HomebodyRecord>,
    late: Extremum<usize, InvasionRecord>,
    quick: Extremum<usize, InvasionRecord>,
    invaders: [[bool; 6]; 2],
    first_invasion: [Option<usize>; 2],
}

impl EnemyTerritoryAnalyzer {
    pub fn new() -> Self {
        Self {
            homebody: Extremum::min(),
            late: Extremum::max(),
            quick: Extremum::min(),
            invaders: [[false; 6]; 2],
            first_invasion: [None; 2],
        }
    }

    fn piece_types(&self, side: Side) -> u32 {
        self.invaders[side as usize].iter().filter(|&&b| b).count() as u32
    }
}

impl Default for EnemyTerritoryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameAnalyzer for EnemyTerritoryAnalyzer {
    fn name(&self) -> &'static str {
        "enemy_territory"
    }

    fn start_game(&mut self, _game: &ParsedGame) {
        self.invaders = [[false; 6]; 2];
        self.first_invasion = [None; 2];
    }

    fn process_move(&mut self, ctx: &MoveContext) {
        let board = ctx.after.board();
        for sq in board.occupied() {
            let Some(piece) = board.piece_at(sq) else {
                continue;
            };
            let side = Side::from_color(piece.color);
            if !in_enemy_half(side, sq) {
                continue;
            }
            let kind = PieceKind::from_role(piece.role);
            let seen = &mut self.invaders[side as usize][kind as usize];
            if !*seen {
                *seen = true;
                self.first_invasion[side as usize].get_or_insert(ctx.mv.ply);
            }
        }
    }

    fn finish_game(&mut self, game: &ParsedGame) {
        let white = self.piece_types(Side::White);
        let black = self.piece_types(Side::Black);
        let gref = GameRef::of(game);

        if white > 0 || black > 0 {
            for (side, pieces) in [(Side::White, white), (Side::Black, black)] {
                self.homebody.offer(pieces, || HomebodyRecord {
                    player: side,
                    player_name: gref.player(side).to_string(),
                    pieces_in_enemy: pieces,
                    game: gref.clone(),
                });
            }
        }

        for side in Side::BOTH {
            let Some(ply) = self.first_invasion[side as usize] else {
                continue;
            };
            let move_number = ply / 2 + 1;
            let record = || InvasionRecord {
                player: side,
                player_name: gref.player(side).to_string(),
                move_number,
                game: gref.clone(),
            };
            self.late.offer(move_number, record);
            self.quick.offer(move_number, record);
        }
    }
}

impl Superlative for EnemyTerritoryAnalyzer {
    type Record = TerritoryAwards;

    fn into_record(self) -> Option<TerritoryAwards> {
        Some(TerritoryAwards {
            homebody: self.homebody.into_record(),
            late_bloomer: self.late.into_record(),
            quick_draw: self.quick.into_record(),
        })
    }
}
