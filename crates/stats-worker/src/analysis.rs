//! Engine analysis of a game: win-percentage loss per move, ACPL, accuracy,
//! and the game's biggest blunder, comeback and lucky escape.
//!
//! Scores arrive from White's point of view, one per position: the start
//! position, then the position after every ply.

use chess_analyzers::records::Extremum;
use chess_analyzers::GameRef;
use chess_core::{MoveAnnotation, ParsedGame, Side};
use league_stats::reports::{
    BlunderRecord, CombinedAcplRecord, ComebackRecord, EscapeRecord, PerformanceRecord,
    SummaryBlunder, SummaryComeback, SummaryEscape,
};
use league_stats::{AnalysisReport, AnalysisSummary, GameAnalysis, MoveQuality};
use shakmaty::fen::Fen;
use shakmaty::{Chess, EnPassantMode, Position};

use crate::error::WorkerError;
use crate::evaluator::{Evaluator, Score};

/// Per-move centipawn losses are capped here before averaging.
const ACPL_CAP: i32 = 150;
/// Recent evaluations searched for the low point of a comeback.
const HISTORY: usize = 10;
const MIN_HISTORY: usize = 5;
const SWING_CAP: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

/// Expected score in percent for a White-relative centipawn value.
pub fn win_percent(cp: i32) -> f64 {
    50.0 + 50.0 * (2.0 / (1.0 + 10f64.powf(-f64::from(cp) / 400.0)) - 1.0)
}

/// Quality of a move from the mover's win-percentage loss.
pub fn classify(win_before: f64, win_after: f64, side: Side) -> (Quality, f64) {
    let loss = match side {
        Side::White => win_before - win_after,
        Side::Black => (100.0 - win_before) - (100.0 - win_after),
    };
    let loss = loss.max(0.0);

    let quality = if loss < 2.0 {
        Quality::Excellent
    } else if loss < 5.0 {
        Quality::Good
    } else if loss < 10.0 {
        Quality::Inaccuracy
    } else if loss < 20.0 {
        Quality::Mistake
    } else if win_before > 10.0 && win_before < 90.0 {
        Quality::Blunder
    } else {
        // already decided
        Quality::Mistake
    };
    (quality, loss)
}

pub fn accuracy(win_losses: &[f64]) -> f64 {
    if win_losses.is_empty() {
        return 100.0;
    }
    let avg = win_losses.iter().sum::<f64>() / win_losses.len() as f64;
    (103.1668 * (-0.04354 * avg).exp() - 3.1669).clamp(0.0, 100.0)
}

pub fn acpl(cp_losses: &[i32]) -> f64 {
    if cp_losses.is_empty() {
        return 0.0;
    }
    let total: i32 = cp_losses.iter().map(|&l| l.min(ACPL_CAP)).sum();
    f64::from(total) / cp_losses.len() as f64
}

/// How bad a blunder was: mates allowed and advantages thrown away weigh more.
fn severity(win_loss: f64, before: Score, after: Score, side: Side) -> f64 {
    let mut severity = win_loss;
    if let Some(m) = after.mate {
        severity += 100.0 / (f64::from(m.abs()) + 1.0);
    }
    if before.is_mate() {
        let mover_was_mating = match side {
            Side::White => before.cp > 0,
            Side::Black => before.cp < 0,
        };
        if mover_was_mating {
            severity *= 3.0;
        }
    } else {
        let margin = f64::from(before.cp.abs());
        if margin > 200.0 {
            severity *= 1.0 + ((margin - 200.0) / 400.0).min(2.0);
        }
    }
    severity
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Default)]
struct SideTotals {
    win_losses: Vec<f64>,
    cp_losses: Vec<i32>,
    quality: MoveQuality,
}

impl SideTotals {
    fn count(&mut self, quality: Quality) {
        let q = &mut self.quality;
        match quality {
            Quality::Excellent => q.excellent += 1,
            Quality::Good => q.good += 1,
            Quality::Inaccuracy => q.inaccuracies += 1,
            Quality::Mistake => q.mistakes += 1,
            Quality::Blunder => q.blunders += 1,
        }
    }
}

/// Fold one score per position into the game's verdict.
pub fn assess_game(
    game: GameRef,
    moves: &[MoveAnnotation],
    scores: &[Score],
) -> Result<GameAnalysis, WorkerError> {
    if scores.len() != moves.len() + 1 {
        return Err(WorkerError::Analysis(format!(
            "game {}: {} scores for {} moves",
            game.game_index,
            scores.len(),
            moves.len()
        )));
    }

    let mut white = SideTotals::default();
    let mut black = SideTotals::default();
    let mut blunder: Extremum<f64, BlunderRecord> = Extremum::max();
    let mut comeback: Extremum<i32, ComebackRecord> = Extremum::max();
    let mut escape: Extremum<i32, EscapeRecord> = Extremum::max();
    let mut history: Vec<Score> = Vec::with_capacity(HISTORY + 1);

    for (i, m) in moves.iter().enumerate() {
        let (before, after) = (scores[i], scores[i + 1]);
        let side = m.color;
        let move_number = m.move_number_full();
        let totals = match side {
            Side::White => &mut white,
            Side::Black => &mut black,
        };

        let both_cp = !before.is_mate() && !after.is_mate();
        let cp_loss = match side {
            Side::White => (before.cp - after.cp).max(0),
            Side::Black => (after.cp - before.cp).max(0),
        };
        if both_cp {
            totals.cp_losses.push(cp_loss);
        }

        let (quality, win_loss) = classify(win_percent(before.cp), win_percent(after.cp), side);
        totals.count(quality);
        totals.win_losses.push(win_loss);

        if quality == Quality::Blunder {
            let severity = severity(win_loss, before, after, side);
            blunder.offer(severity, || BlunderRecord {
                move_number,
                color: side,
                cp_loss: if both_cp { cp_loss } else { 0 },
                win_loss: round1(win_loss),
                severity: round1(severity),
                san: m.san.clone(),
                eval_before: before.cp,
                eval_after: after.cp,
            });
        }

        // The previous move handed the opponent an advantage they let slip.
        if i > 0 {
            let (prev, now) = (before.cp, after.cp);
            let amount = prev.abs() - now.abs();
            if prev < -200 && now > -50 {
                escape.offer(amount, || EscapeRecord {
                    color: Side::White,
                    escape_amount: amount,
                    eval_before: prev,
                    eval_after: now,
                    move_number,
                });
            }
            if prev > 200 && now < 50 {
                escape.offer(amount, || EscapeRecord {
                    color: Side::Black,
                    escape_amount: amount,
                    eval_before: prev,
                    eval_after: now,
                    move_number,
                });
            }
        }

        history.push(after);
        if history.len() > HISTORY {
            history.remove(0);
        }
        if history.len() >= MIN_HISTORY {
            let low = history
                .iter()
                .copied()
                .reduce(|best, s| if s.cp < best.cp { s } else { best });
            let high = history
                .iter()
                .copied()
                .reduce(|best, s| if s.cp > best.cp { s } else { best });

            if let Some(low) = low.filter(|l| l.cp < -300 && after.cp > 300) {
                let swing = (after.cp - low.cp).min(SWING_CAP);
                comeback.offer(swing, || ComebackRecord {
                    color: Side::White,
                    swing,
                    eval_from: low.label(),
                    eval_to: after.label(),
                    eval_from_cp: low.cp,
                    eval_to_cp: after.cp,
                    move_number,
                });
            }
            if let Some(high) = high.filter(|h| h.cp > 300 && after.cp < -300) {
                let swing = (high.cp - after.cp).min(SWING_CAP);
                comeback.offer(swing, || ComebackRecord {
                    color: Side::Black,
                    swing,
                    eval_from: high.label(),
                    eval_to: after.label(),
                    eval_from_cp: high.cp,
                    eval_to_cp: after.cp,
                    move_number,
                });
            }
        }
    }

    Ok(GameAnalysis {
        game,
        white_acpl: round1(acpl(&white.cp_losses)),
        black_acpl: round1(acpl(&black.cp_losses)),
        white_accuracy: round1(accuracy(&white.win_losses)),
        black_accuracy: round1(accuracy(&black.win_losses)),
        white_move_quality: white.quality,
        black_move_quality: black.quality,
        biggest_blunder: blunder.into_record(),
        biggest_comeback: comeback.into_record(),
        lucky_escape: escape.into_record(),
    })
}

/// FEN of the start position and of the position after every ply.
pub fn position_fens(game: &ParsedGame) -> Vec<String> {
    let mut pos = Chess::default();
    let mut fens = Vec::with_capacity(game.moves.len() + 1);
    fens.push(Fen::from_position(&pos, EnPassantMode::Legal).to_string());
    for m in &game.moves {
        pos.play_unchecked(m.mv);
        fens.push(Fen::from_position(&pos, EnPassantMode::Legal).to_string());
    }
    fens
}

/// Score every position of `game` with `engine`, then assess it.
pub async fn analyze_game<E: Evaluator>(
    engine: &mut E,
    game: &ParsedGame,
) -> Result<GameAnalysis, WorkerError> {
    let fens = position_fens(game);
    let mut scores = Vec::with_capacity(fens.len());
    for fen in &fens {
        scores.push(engine.evaluate(fen).await?);
    }
    assess_game(GameRef::of(game), &game.moves, &scores)
}

/// Round-wide superlatives; on equal values the earlier game, then White, wins.
pub fn summarize(games: &[GameAnalysis]) -> AnalysisSummary {
    let mut accuracy_king = Extremum::max();
    let mut lowest_acpl = Extremum::min();
    let mut highest_acpl = Extremum::max();
    let mut lowest_combined = Extremum::min();
    let mut highest_combined = Extremum::max();
    let mut blunder = Extremum::max();
    let mut comeback = Extremum::max();
    let mut escape = Extremum::max();

    for g in games {
        for side in Side::BOTH {
            let performance = || PerformanceRecord {
                player: g.game.player(side).to_string(),
                color: side,
                accuracy: g.accuracy(side),
                acpl: g.acpl(side),
                game: g.game.clone(),
            };
            accuracy_king.offer(g.accuracy(side), performance);
            lowest_acpl.offer(g.acpl(side), performance);
            highest_acpl.offer(g.acpl(side), performance);
        }

        let combined = g.combined_acpl();
        let record = || CombinedAcplRecord {
            combined_acpl: combined,
            white_acpl: g.white_acpl,
            black_acpl: g.black_acpl,
            game: g.game.clone(),
        };
        lowest_combined.offer(combined, record);
        highest_combined.offer(combined, record);

        if let Some(b) = &g.biggest_blunder {
            blunder.offer(b.severity, || SummaryBlunder {
                player: g.game.player(b.color).to_string(),
                blunder: b.clone(),
                game: g.game.clone(),
            });
        }
        if let Some(c) = &g.biggest_comeback {
            comeback.offer(c.swing, || SummaryComeback {
                player: g.game.player(c.color).to_string(),
                comeback: c.clone(),
                game: g.game.clone(),
            });
        }
        if let Some(e) = &g.lucky_escape {
            escape.offer(e.escape_amount, || SummaryEscape {
                player: g.game.player(e.color).to_string(),
                escape: e.clone(),
                game: g.game.clone(),
            });
        }
    }

    AnalysisSummary {
        accuracy_king: accuracy_king.into_record(),
        biggest_blunder: blunder.into_record(),
        comeback_king: comeback.into_record(),
        lucky_escape: escape.into_record(),
        lowest_acpl: lowest_acpl.into_record(),
        highest_acpl: highest_acpl.into_record(),
        lowest_combined_acpl: lowest_combined.into_record(),
        highest_combined_acpl: highest_combined.into_record(),
    }
}

pub fn report(games: Vec<GameAnalysis>) -> AnalysisReport {
    let summary = summarize(&games);
    AnalysisReport { games, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    fn game(moves: &str) -> ParsedGame {
        parse_game(3, &format!("[White \"Ann\"]\n[Black \"Bo\"]\n\n{moves} *")).unwrap()
    }

    fn cps(values: &[i32]) -> Vec<Score> {
        values.iter().map(|&cp| Score::cp(cp)).collect()
    }

    #[test]
    fn test_win_percent_is_symmetric() {
        assert!((win_percent(0) - 50.0).abs() < 1e-9);
        assert!((win_percent(300) + win_percent(-300) - 100.0).abs() < 1e-9);
        assert!(win_percent(400) > 90.0);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(50.0, 49.0, Side::White).0, Quality::Excellent);
        assert_eq!(classify(50.0, 46.0, Side::White).0, Quality::Good);
        assert_eq!(classify(50.0, 42.0, Side::White).0, Quality::Inaccuracy);
        assert_eq!(classify(50.0, 35.0, Side::White).0, Quality::Mistake);
        assert_eq!(classify(50.0, 20.0, Side::White).0, Quality::Blunder);
        // Black gains when White's percentage drops
        assert_eq!(classify(50.0, 20.0, Side::Black), (Quality::Excellent, 0.0));
        assert_eq!(classify(50.0, 80.0, Side::Black).0, Quality::Blunder);
        // Already lost: a big drop is only a mistake
        assert_eq!(classify(95.0, 40.0, Side::White).0, Quality::Mistake);
    }

    #[test]
    fn test_accuracy_and_acpl() {
        assert_eq!(accuracy(&[]), 100.0);
        assert!((accuracy(&[0.0]) - 99.9999).abs() < 1e-3);
        assert_eq!(accuracy(&[100.0]), 0.0);
        assert_eq!(acpl(&[]), 0.0);
        assert_eq!(acpl(&[10, 500]), 80.0);
    }

    #[test]
    fn test_blunder_found_and_cp_loss_capped() {
        let g = game("1. e4 e5 2. Nf3 Nc6");
        // White's second move drops 400 centipawns.
        let a = assess_game(GameRef::of(&g), &g.moves, &cps(&[20, 20, 20, -380, -380])).unwrap();
        assert_eq!(a.white_move_quality.blunders, 1);
        assert_eq!(a.white_acpl, 75.0);
        assert_eq!(a.black_acpl, 0.0);
        let b = a.biggest_blunder.unwrap();
        assert_eq!(b.move_number, 2);
        assert_eq!(b.color, Side::White);
        assert_eq!(b.cp_loss, 400);
        assert_eq!(b.san, "Nf3");
        assert_eq!(a.game.game_index, 3);
    }

    #[test]
    fn test_mate_scores_skip_acpl() {
        let g = game("1. e4 e5");
        let scores = [Score::cp(20), Score::mate(-3), Score::cp(0)];
        let a = assess_game(GameRef::of(&g), &g.moves, &scores).unwrap();
        assert_eq!(a.white_acpl, 0.0);
        let b = a.biggest_blunder.unwrap();
        assert_eq!(b.cp_loss, 0);
        assert_eq!(b.eval_after, -9970);
    }

    #[test]
    fn test_lucky_escape() {
        let g = game("1. e4 e5 2. Nf3 Nc6");
        // Black misses White's blunder: -350 back to +10.
        let a = assess_game(GameRef::of(&g), &g.moves, &cps(&[0, 20, 20, -350, 10])).unwrap();
        let e = a.lucky_escape.unwrap();
        assert_eq!(e.color, Side::White);
        assert_eq!(e.escape_amount, 340);
        assert_eq!(e.move_number, 2);
    }

    #[test]
    fn test_comeback_needs_five_positions() {
        let g = game("1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5");
        let scores = [
            Score::cp(0),
            Score::cp(-100),
            Score::cp(-400),
            Score::cp(-200),
            Score::cp(100),
            Score::cp(200),
            Score::mate(2),
        ];
        let a = assess_game(GameRef::of(&g), &g.moves, &scores).unwrap();
        let c = a.biggest_comeback.unwrap();
        assert_eq!(c.color, Side::White);
        assert_eq!(c.eval_from, "-400");
        assert_eq!(c.eval_to, "M2");
        assert_eq!(c.swing, SWING_CAP);
        assert_eq!(c.move_number, 3);
    }

    #[test]
    fn test_score_count_must_match() {
        let g = game("1. e4 e5");
        assert!(assess_game(GameRef::of(&g), &g.moves, &cps(&[0, 0])).is_err());
    }

    #[test]
    fn test_fens_follow_the_game() {
        let fens = position_fens(&game("1. e4 e5"));
        assert_eq!(fens.len(), 3);
        assert_eq!(fens[0], "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(fens[1].ends_with(" b KQkq - 0 1"));
    }

    #[test]
    fn test_summary_prefers_white_on_ties() {
        let g = game("1. e4 e5");
        let a = assess_game(GameRef::of(&g), &g.moves, &cps(&[0, 0, 0])).unwrap();
        let summary = summarize(&[a]);
        let king = summary.accuracy_king.unwrap();
        assert_eq!(king.player, "Ann");
        assert_eq!(king.color, Side::White);
        assert!(summary.biggest_blunder.is_none());
        assert_eq!(summary.lowest_combined_acpl.unwrap().combined_acpl, 0.0);
    }
}
