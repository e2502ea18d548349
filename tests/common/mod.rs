#![allow(dead_code)]

use std::path::PathBuf;

use chess_core::{parse_games, ParseOutcome};
use chrono::{DateTime, TimeZone, Utc};
use league_stats::{RoundBuilder, RoundDocument};

/// 40 plies; White takes the queen on ply 10, Black retakes on ply 11.
pub const QUEEN_TRADE_GAME: &str = r#"[Event "League"]
[White "Ann «The Rook» Lee"]
[Black "Bo «Ghost» K."]
[Result "1-0"]

1. d4 e5 2. dxe5 d6 3. Nf3 Nc6 4. Nc3 Nf6 5. exd6 Qxd6 6. Qxd6 Bxd6
7. Ng1 Ng8 8. Nf3 Nf6 9. Ng1 Ng8 10. Nf3 Nf6 11. Ng1 Ng8 12. Nf3 Nf6
13. Ng1 Ng8 14. Nf3 Nf6 15. Ng1 Ng8 16. Nf3 Nf6 17. Ng1 Ng8 18. Nf3 Nf6
19. Ng1 Ng8 20. Nf3 Nf6 1-0"#;

pub const FORFEIT_GAME: &str = r#"[Event "League"]
[White "Cy Moss"]
[Black "Di Park"]
[Result "1/2-1/2"]

1/2-1/2"#;

pub const FOOLS_MATE: &str = r#"[Event "League"]
[White "Di Park"]
[Black "Cy Moss"]
[Result "0-1"]

1. f3 e5 2. g4 Qh4# 0-1"#;

/// Quiet draw in which only the queen of White moves, d1-h5-f3.
pub fn queen_walk(white: &str, black: &str) -> String {
    format!(
        "[Event \"League\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"1/2-1/2\"]\n\n\
         1. e4 e5 2. Qh5 Nc6 3. Qf3 Nf6 1/2-1/2"
    )
}

pub fn round_text(games: &[&str]) -> String {
    games.join("\n\n")
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn parse(games: &[&str]) -> ParseOutcome {
    parse_games(&round_text(games))
}

/// Round document with a pinned timestamp.
pub fn build_round(season: u32, round: u32, games: &[&str]) -> RoundDocument {
    RoundBuilder::new(season, round)
        .increment(45)
        .generated_at(fixed_time())
        .build(&parse(games))
}

/// Fresh scratch directory unique to this test binary and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "league-stats-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
