//! PGN normalization, game splitting and SAN replay.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use shakmaty::san::{San, SanPlus};
use shakmaty::{Chess, Position};
use tracing::{debug, warn};

use crate::clock::extract_annotations;
use crate::error::PgnError;
use crate::model::{
    GameResult, MoveAnnotation, MoveFlags, ParsedGame, PieceCensus, PieceKind, Side,
};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Headers accepted as the first line of a new game.
const GAME_START_TAGS: &[&str] = &["[Event ", "[White ", "[Black ", "[Site ", "[Date ", "[Round "];

const SAMPLE_LEN: usize = 200;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap());
static HEADER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\[\w+\s+"[^"]*"\]"#).unwrap());
static INLINE_MOVES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\][^\n]*?)(\d+\.\s*[a-hNBRQKO])").unwrap());
static FIRST_MOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1\.\s*[a-hNBRQKO]").unwrap());
static NAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip comments and variations, and repair the header/move-text boundary.
///
/// Bracketed header content is copied verbatim so braces or parentheses in
/// tag values survive.
pub fn normalize_pgn(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len());
    let mut comment_depth = 0usize;
    let mut variation_depth = 0usize;
    let mut in_header = false;
    let mut in_line_comment = false;

    for c in text.chars() {
        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
                out.push(c);
            }
            continue;
        }
        let outside = comment_depth == 0 && variation_depth == 0;
        match c {
            '[' if outside => {
                in_header = true;
                out.push(c);
            }
            ']' if in_header && outside => {
                in_header = false;
                out.push(c);
            }
            _ if in_header => out.push(c),
            '{' => comment_depth += 1,
            '}' if comment_depth > 0 => comment_depth -= 1,
            '(' if comment_depth == 0 => variation_depth += 1,
            ')' if variation_depth > 0 && comment_depth == 0 => variation_depth -= 1,
            ';' if outside => in_line_comment = true,
            _ if outside => out.push(c),
            _ => {}
        }
    }

    let out = INLINE_MOVES_RE.replace_all(&out, "$1\n\n$2");
    let out = NAG_RE.replace_all(&out, "");

    let lines: Vec<&str> = out.split('\n').map(str::trim_end).collect();
    let last_header = lines.iter().rposition(|l| HEADER_LINE_RE.is_match(l));
    let mut rebuilt: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    for (i, line) in lines.iter().enumerate() {
        rebuilt.push(line);
        if Some(i) == last_header {
            if let Some(next) = lines.get(i + 1) {
                if FIRST_MOVE_RE.is_match(next.trim()) {
                    rebuilt.push("");
                }
            }
        }
    }

    BLANK_RUN_RE
        .replace_all(rebuilt.join("\n").trim(), "\n\n")
        .into_owned()
}

fn starts_game(line: &str) -> bool {
    GAME_START_TAGS.iter().any(|tag| line.starts_with(tag))
}

/// Split a multi-game blob into raw per-game strings, annotations intact.
pub fn split_games(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n");
    let mut games = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut prev: Option<&str> = None;

    for line in text.split('\n') {
        let boundary = starts_game(line)
            && match prev {
                Some(p) => {
                    let p = p.trim();
                    p.is_empty() || !p.starts_with('[')
                }
                None => false,
            };
        if boundary && current.iter().any(|l| !l.trim().is_empty()) {
            games.push(current.join("\n").trim().to_string());
            current.clear();
        }
        current.push(line);
        prev = Some(line);
    }
    let last = current.join("\n");
    if !last.trim().is_empty() {
        games.push(last.trim().to_string());
    }
    games
}

fn parse_headers(pgn: &str) -> BTreeMap<String, String> {
    HEADER_RE
        .captures_iter(pgn)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

/// SAN tokens of the move text, move numbers, results and glyphs removed.
fn move_tokens(pgn: &str) -> Vec<&str> {
    let body = match pgn.rfind(']') {
        Some(end) if HEADER_RE.is_match(pgn) => &pgn[end + 1..],
        _ => pgn,
    };
    body.split_whitespace()
        .filter(|t| !GameResult::is_result_token(t))
        .map(|t| match t {
            "0-0" => "O-O",
            "0-0-0" => "O-O-O",
            _ => t,
        })
        .map(|t| t.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.'))
        .map(|t| t.trim_end_matches(['!', '?']))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse and replay one game. `raw` is the game as split from the round file.
pub fn parse_game(index: usize, raw: &str) -> Result<ParsedGame, PgnError> {
    let pgn = normalize_pgn(raw);
    let headers = parse_headers(&pgn);
    let tokens = move_tokens(&pgn);

    if headers.is_empty() && tokens.is_empty() {
        return Err(PgnError::EmptyGame);
    }

    // Only standard starting positions are replayed
    if headers.get("SetUp").map(String::as_str) == Some("1") {
        if let Some(fen) = headers.get("FEN") {
            if fen != STANDARD_START_FEN {
                return Err(PgnError::UnsupportedSetup(fen.clone()));
            }
        }
    }

    let annotations = extract_annotations(raw);
    let mut pos = Chess::default();
    let mut moves = Vec::with_capacity(tokens.len());

    for (ply, token) in tokens.iter().enumerate() {
        let san_plus: SanPlus = token.parse().map_err(|_| PgnError::InvalidSan {
            ply,
            token: token.to_string(),
        })?;
        let mv = san_plus
            .san
            .to_move(&pos)
            .map_err(|e| PgnError::IllegalMove {
                ply,
                san: token.to_string(),
                reason: e.to_string(),
            })?;

        let turn = pos.turn();
        let from = mv.from().ok_or_else(|| PgnError::IllegalMove {
            ply,
            san: token.to_string(),
            reason: "piece drops are not supported".into(),
        })?;
        let to = match mv.castling_side() {
            Some(side) => side.king_to(turn),
            None => mv.to(),
        };
        let san = San::from_move(&pos, mv);

        pos.play_unchecked(mv);

        let checkmate = pos.is_checkmate();
        let check = !checkmate && pos.is_check();
        let suffix = if checkmate {
            "#"
        } else if check {
            "+"
        } else {
            ""
        };
        let note = annotations.get(ply).copied().unwrap_or_default();

        moves.push(MoveAnnotation {
            ply,
            color: Side::from_color(turn),
            piece: PieceKind::from_role(mv.role()),
            from,
            to,
            captured: mv.capture().map(PieceKind::from_role),
            promotion: mv.promotion().map(PieceKind::from_role),
            flags: MoveFlags {
                kingside_castle: mv.castling_side().is_some_and(|s| s.is_king_side()),
                queenside_castle: mv.castling_side().is_some_and(|s| s.is_queen_side()),
                en_passant: mv.is_en_passant(),
                check,
                checkmate,
            },
            san: format!("{san}{suffix}"),
            clock_seconds: note.clock_seconds,
            eval: note.eval,
            mv,
        });
    }

    let mut result = headers
        .get("Result")
        .map(|r| GameResult::from_tag(r))
        .unwrap_or(GameResult::Unknown);
    if result == GameResult::Unknown && !moves.is_empty() {
        result = if pos.is_checkmate() {
            GameResult::from_winner(Side::from_color(pos.turn()).opposite())
        } else if pos.is_stalemate() || pos.is_insufficient_material() {
            GameResult::Draw
        } else {
            GameResult::Unknown
        };
    }

    debug!(index, plies = moves.len(), "Game replayed");

    Ok(ParsedGame {
        index,
        headers,
        final_census: PieceCensus::from_board(pos.board()),
        moves,
        result,
        pgn,
        raw_pgn: raw.to_string(),
    })
}

/// A game that could not be replayed; it still counts toward round totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameParseFailure {
    pub game_index: usize,
    pub reason: String,
    pub pgn_sample: String,
}

impl GameParseFailure {
    pub fn new(game_index: usize, raw: &str, error: &PgnError) -> Self {
        let mut pgn_sample: String = raw.chars().take(SAMPLE_LEN).collect();
        if raw.chars().count() > SAMPLE_LEN {
            pgn_sample.push_str("...");
        }
        Self {
            game_index,
            reason: error.to_string(),
            pgn_sample,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub games: Vec<ParsedGame>,
    pub errors: Vec<GameParseFailure>,
    /// Candidate games found, failures included.
    pub total_games: usize,
}

/// Parse every game in a round file. Failures are isolated per game.
pub fn parse_games(text: &str) -> ParseOutcome {
    let chunks = split_games(text);
    let mut outcome = ParseOutcome {
        total_games: chunks.len(),
        ..Default::default()
    };

    for (index, raw) in chunks.iter().enumerate() {
        match parse_game(index, raw) {
            Ok(game) => outcome.games.push(game),
            Err(e) => {
                warn!(game_index = index, error = %e, "Failed to parse game");
                outcome.errors.push(GameParseFailure::new(index, raw, &e));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GAMES: &str = r#"[Event "League"]
[White "Ann «The Rook» Lee"]
[Black "Bo K."]
[Result "1-0"]
[Site "https://lichess.org/abcd1234"]

1. e4 { [%clk 0:30:00] } 1... e5 { [%clk 0:30:00] } 2. Qh5 Nc6 3. Bc4 Nf6?? 4. Qxf7# 1-0

[Event "League"]
[White "Cy"]
[Black "Di"]
[Result "1/2-1/2"]

1/2-1/2"#;

    #[test]
    fn test_split_games_on_header_boundary() {
        let games = split_games(TWO_GAMES);
        assert_eq!(games.len(), 2);
        assert!(games[0].contains("[%clk 0:30:00]"));
        assert!(games[1].starts_with("[Event"));
    }

    #[test]
    fn test_split_without_event_tag() {
        let text = "[White \"A\"]\n[Black \"B\"]\n\n1. e4 e5 *\n\n[White \"C\"]\n[Black \"D\"]\n\n1. d4 *";
        assert_eq!(split_games(text).len(), 2);
    }

    #[test]
    fn test_normalize_strips_comments_and_variations() {
        let pgn = "[Event \"x (y)\"]\n1. e4 {good (really)} (1. d4 {alt} d5) e5 $1 2. Nf3";
        let normalized = normalize_pgn(pgn);
        assert!(normalized.contains("[Event \"x (y)\"]"));
        assert!(normalized.contains("\n\n1. e4"));
        assert!(!normalized.contains("good"));
        assert!(!normalized.contains("d4"));
        assert!(!normalized.contains("$1"));
    }

    #[test]
    fn test_normalize_repairs_inline_move_text() {
        let pgn = "[White \"A\"][Black \"B\"]1. e4 e5";
        let normalized = normalize_pgn(pgn);
        assert!(normalized.contains("]\n\n1. e4"));
    }

    #[test]
    fn test_parse_game_builds_annotations() {
        let raw = &split_games(TWO_GAMES)[0];
        let game = parse_game(0, raw).unwrap();
        assert_eq!(game.white(), "Ann «The Rook» Lee");
        assert_eq!(game.game_id().as_deref(), Some("abcd1234"));
        assert_eq!(game.moves.len(), 7);
        assert_eq!(game.result, GameResult::WhiteWin);

        let mate = &game.moves[6];
        assert_eq!(mate.san, "Qxf7#");
        assert_eq!(mate.piece, PieceKind::Queen);
        assert_eq!(mate.captured, Some(PieceKind::Pawn));
        assert!(mate.flags.checkmate);
        assert_eq!(mate.to.to_string(), "f7");
        assert_eq!(mate.move_number_full(), 4);

        assert_eq!(game.moves[0].clock_seconds, Some(1800.0));
        assert_eq!(game.moves[2].clock_seconds, None);
        assert_eq!(game.final_census.black.pawns, 7);
        assert!(game.raw_pgn.contains("[%clk"));
        assert!(!game.pgn.contains("[%clk"));
    }

    #[test]
    fn test_castling_destination_is_king_square() {
        let game = parse_game(0, "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 *").unwrap();
        let castle = &game.moves[6];
        assert!(castle.flags.kingside_castle);
        assert_eq!(castle.from.to_string(), "e1");
        assert_eq!(castle.to.to_string(), "g1");
        assert_eq!(castle.piece, PieceKind::King);
    }

    #[test]
    fn test_zero_move_game_is_valid() {
        let raw = &split_games(TWO_GAMES)[1];
        let game = parse_game(1, raw).unwrap();
        assert!(!game.has_moves());
        assert_eq!(game.result, GameResult::Draw);
    }

    #[test]
    fn test_illegal_move_reports_ply() {
        let err = parse_game(0, "1. e4 e5 2. Ke3 *").unwrap_err();
        assert!(matches!(err, PgnError::IllegalMove { ply: 2, .. }));
    }

    #[test]
    fn test_parse_games_isolates_failures() {
        let text = format!("{TWO_GAMES}\n\n[Event \"Broken\"]\n\n1. e4 e5 2. Bxf7 *");
        let outcome = parse_games(&text);
        assert_eq!(outcome.total_games, 3);
        assert_eq!(outcome.games.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].game_index, 2);
        assert!(outcome.errors[0].pgn_sample.starts_with("[Event \"Broken\"]"));
    }

    #[test]
    fn test_result_derived_from_final_position() {
        let game = parse_game(0, "1. f3 e5 2. g4 Qh4#").unwrap();
        assert_eq!(game.result, GameResult::BlackWin);
    }

    #[test]
    fn test_unicode_draw_marker_ends_movetext() {
        let pgn = "[White \"A\"]\n[Black \"B\"]\n[Result \"½-½\"]\n\n1. e4 e5 ½-½";
        let game = parse_game(0, pgn).unwrap();
        assert_eq!(game.moves.len(), 2);
        assert_eq!(game.result, GameResult::Draw);
    }
}
