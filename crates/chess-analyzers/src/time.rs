//! Per-move time usage from `[%clk]` annotations and the round's time awards.

use chess_core::{GameResult, ParsedGame, Side};
use serde::{Deserialize, Serialize};

use crate::records::{Extremum, GameRef};

const PREMOVE_SECS: f64 = 0.5;
const ZEITNOT_SECS: f64 = 60.0;
const EXTREME_SECS: f64 = 30.0;
const CRITICAL_SECS: f64 = 10.0;
/// Pawn evaluation at which a position counts as decided.
const DECISIVE_EVAL: f64 = 100.0;
const LOST_EVAL: f64 = -5.0;
const BULLET_MIN_MOVES: usize = 20;
const OPENING_LAST_MOVE: usize = 10;
const OPENING_MIN_MOVES: usize = 8;

/// One measured move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTiming {
    pub ply: usize,
    pub move_number: usize,
    pub color: Side,
    pub san: String,
    pub time_spent_seconds: f64,
    pub clock_remaining_seconds: f64,
    pub eval_before: Option<f64>,
    pub eval_after: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideCounts {
    pub white: u32,
    pub black: u32,
}

impl SideCounts {
    fn add(&mut self, side: Side) {
        match side {
            Side::White => self.white += 1,
            Side::Black => self.black += 1,
        }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    pub fn total(&self) -> u32 {
        self.white + self.black
    }
}

/// Clock usage of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTiming {
    #[serde(flatten)]
    pub game: GameRef,
    pub result: GameResult,
    pub premoves: SideCounts,
    pub zeitnot: SideCounts,
    pub extreme_pressure: SideCounts,
    pub critical_scramble: SideCounts,
    pub moves: Vec<MoveTiming>,
}

impl GameTiming {
    pub fn moves_by(&self, side: Side) -> impl Iterator<Item = &MoveTiming> {
        self.moves.iter().filter(move |m| m.color == side)
    }

    pub fn average_time(&self, side: Side) -> Option<f64> {
        average(self.moves_by(side).map(|m| m.time_spent_seconds))
    }

    pub fn min_clock(&self, side: Side) -> Option<f64> {
        self.moves_by(side)
            .map(|m| m.clock_remaining_seconds)
            .reduce(f64::min)
    }

    /// First move with the largest time spent.
    pub fn longest_think(&self) -> Option<&MoveTiming> {
        let mut best: Extremum<f64, &MoveTiming> = Extremum::max();
        for m in &self.moves {
            best.offer(m.time_spent_seconds, || m);
        }
        best.into_record()
    }
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Measure every move whose clock can be compared against the same side's
/// previous reading. `None` when the game carries no usable clock data.
pub fn analyze_game_time(game: &ParsedGame, increment: u32) -> Option<GameTiming> {
    let increment = f64::from(increment);
    let base = game.time_control().map(|(base, _)| f64::from(base));
    let mut last_clock: [Option<f64>; 2] = [base, base];
    let mut moves = Vec::new();

    for (i, m) in game.moves.iter().enumerate() {
        let Some(clock) = m.clock_seconds else {
            continue;
        };
        let side = m.color as usize;
        if let Some(previous) = last_clock[side] {
            let eval_before = i
                .checked_sub(1)
                .and_then(|p| game.moves[p].eval)
                .map(|e| e.as_pawns());
            moves.push(MoveTiming {
                ply: m.ply,
                move_number: m.move_number_full(),
                color: m.color,
                san: m.san.clone(),
                time_spent_seconds: (previous + increment - clock).max(0.0),
                clock_remaining_seconds: clock,
                eval_before,
                eval_after: m.eval.map(|e| e.as_pawns()),
            });
        }
        last_clock[side] = Some(clock);
    }

    if moves.is_empty() {
        return None;
    }

    let mut timing = GameTiming {
        game: GameRef::of(game),
        result: game.result,
        premoves: SideCounts::default(),
        zeitnot: SideCounts::default(),
        extreme_pressure: SideCounts::default(),
        critical_scramble: SideCounts::default(),
        moves,
    };
    for m in &timing.moves {
        if m.time_spent_seconds < PREMOVE_SECS {
            timing.premoves.add(m.color);
        }
        if m.clock_remaining_seconds < ZEITNOT_SECS {
            timing.zeitnot.add(m.color);
        }
        if m.clock_remaining_seconds < EXTREME_SECS {
            timing.extreme_pressure.add(m.color);
        }
        if m.clock_remaining_seconds < CRITICAL_SECS {
            timing.critical_scramble.add(m.color);
        }
    }
    Some(timing)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountRecord {
    pub player: String,
    pub color: Side,
    pub count: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkRecord {
    pub player: String,
    pub color: Side,
    pub time_spent: f64,
    pub move_number: usize,
    #[serde(rename = "move")]
    pub san: String,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrambleRecord {
    pub player: String,
    pub color: Side,
    pub min_clock: f64,
    pub critical_moves: u32,
    pub result: GameResult,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceRecord {
    pub player: String,
    pub color: Side,
    pub avg_time: f64,
    pub move_count: usize,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SniperRecord {
    pub player: String,
    pub color: Side,
    pub time_spent: f64,
    pub move_number: usize,
    #[serde(rename = "move")]
    pub san: String,
    pub eval_before: f64,
    pub eval_after: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SadTimesRecord {
    pub player: String,
    pub color: Side,
    pub time_spent: f64,
    pub move_number: usize,
    #[serde(rename = "move")]
    pub san: String,
    pub eval: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSummary {
    pub total_games_with_clock_data: usize,
    pub avg_premoves_per_game: f64,
    pub avg_zeitnot_moves_per_game: f64,
    pub games_with_timescramble: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeAwards {
    pub most_premoves: Option<CountRecord>,
    pub longest_think: Option<ThinkRecord>,
    pub zeitnot_addict: Option<CountRecord>,
    pub time_scramble_survivor: Option<ScrambleRecord>,
    pub bullet_speed: Option<PaceRecord>,
    pub sniper: Option<SniperRecord>,
    pub opening_blitzer: Option<PaceRecord>,
    pub sad_times: Option<SadTimesRecord>,
    pub summary: Option<TimeSummary>,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn think(t: &GameTiming, m: &MoveTiming) -> ThinkRecord {
    ThinkRecord {
        player: t.game.player(m.color).to_string(),
        color: m.color,
        time_spent: m.time_spent_seconds,
        move_number: m.move_number,
        san: m.san.clone(),
        game: t.game.clone(),
    }
}

fn pace(t: &GameTiming, side: Side, avg_time: f64, move_count: usize) -> PaceRecord {
    PaceRecord {
        player: t.game.player(side).to_string(),
        color: side,
        avg_time,
        move_count,
        game: t.game.clone(),
    }
}

/// Fold per-game timings into the round's time awards.
pub fn time_awards(timings: &[GameTiming]) -> TimeAwards {
    if timings.is_empty() {
        return TimeAwards::default();
    }

    let mut premoves = Extremum::max();
    let mut zeitnot = Extremum::max();
    let mut longest = Extremum::max();
    let mut scramble = Extremum::min();
    let mut bullet = Extremum::min();
    let mut sniper = Extremum::min();
    let mut blitzer = Extremum::min();
    let mut sad = Extremum::max();
    let mut scrambles = 0usize;

    for t in timings {
        for side in Side::BOTH {
            let count_record = |count: u32| CountRecord {
                player: t.game.player(side).to_string(),
                color: side,
                count,
                game: t.game.clone(),
            };
            let p = t.premoves.get(side);
            if p > 0 {
                premoves.offer(p, || count_record(p));
            }
            let z = t.zeitnot.get(side);
            if z > 0 {
                zeitnot.offer(z, || count_record(z));
            }

            let timed: Vec<&MoveTiming> = t.moves_by(side).collect();
            if timed.len() >= BULLET_MIN_MOVES {
                if let Some(avg) = t.average_time(side) {
                    bullet.offer(avg, || pace(t, side, avg, timed.len()));
                }
            }
            let opening: Vec<f64> = timed
                .iter()
                .filter(|m| m.move_number <= OPENING_LAST_MOVE)
                .map(|m| m.time_spent_seconds)
                .collect();
            if opening.len() >= OPENING_MIN_MOVES {
                if let Some(avg) = average(opening.iter().copied()) {
                    blitzer.offer(avg, || pace(t, side, avg, opening.len()));
                }
            }
        }

        if let Some(m) = t.longest_think() {
            if m.time_spent_seconds > 0.0 {
                longest.offer(m.time_spent_seconds, || think(t, m));
            }
        }

        if let Some(winner) = t.result.winner() {
            let critical = t.critical_scramble.get(winner);
            if critical > 0 {
                scrambles += 1;
                if let Some(min_clock) = t.min_clock(winner) {
                    scramble.offer(min_clock, || ScrambleRecord {
                        player: t.game.player(winner).to_string(),
                        color: winner,
                        min_clock,
                        critical_moves: critical,
                        result: t.result,
                        game: t.game.clone(),
                    });
                }
            }
        }

        for m in &t.moves {
            if let (Some(before), Some(after)) = (m.eval_before, m.eval_after) {
                if after.abs() >= DECISIVE_EVAL && before.abs() < DECISIVE_EVAL {
                    sniper.offer(m.time_spent_seconds, || SniperRecord {
                        player: t.game.player(m.color).to_string(),
                        color: m.color,
                        time_spent: m.time_spent_seconds,
                        move_number: m.move_number,
                        san: m.san.clone(),
                        eval_before: before,
                        eval_after: after,
                        game: t.game.clone(),
                    });
                }
            }
            if let Some(before) = m.eval_before {
                let own = match m.color {
                    Side::White => before,
                    Side::Black => -before,
                };
                if own < LOST_EVAL {
                    sad.offer(m.time_spent_seconds, || SadTimesRecord {
                        player: t.game.player(m.color).to_string(),
                        color: m.color,
                        time_spent: m.time_spent_seconds,
                        move_number: m.move_number,
                        san: m.san.clone(),
                        eval: own,
                        game: t.game.clone(),
                    });
                }
            }
        }
    }

    let n = timings.len() as f64;
    let premove_total: u32 = timings.iter().map(|t| t.premoves.total()).sum();
    let zeitnot_total: u32 = timings.iter().map(|t| t.zeitnot.total()).sum();

    TimeAwards {
        most_premoves: premoves.into_record(),
        longest_think: longest.into_record(),
        zeitnot_addict: zeitnot.into_record(),
        time_scramble_survivor: scramble.into_record(),
        bullet_speed: bullet.into_record(),
        sniper: sniper.into_record(),
        opening_blitzer: blitzer.into_record(),
        sad_times: sad.into_record(),
        summary: Some(TimeSummary {
            total_games_with_clock_data: timings.len(),
            avg_premoves_per_game: round1(f64::from(premove_total) / n),
            avg_zeitnot_moves_per_game: round1(f64::from(zeitnot_total) / n),
            games_with_timescramble: scrambles,
        }),
    }
}

/// Timings of every game that has clock data, then the awards over them.
pub fn analyze_round_time(games: &[&ParsedGame], increment: u32) -> TimeAwards {
    let timings: Vec<GameTiming> = games
        .iter()
        .filter_map(|g| analyze_game_time(g, increment))
        .collect();
    time_awards(&timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    const CLOCKED: &str = r#"[White "Ann"]
[Black "Bo"]
[Result "0-1"]
[TimeControl "600+5"]

1. e4 { [%eval 0.3] [%clk 0:09:58] } 1... e5 { [%eval 0.3] [%clk 0:09:40] } 2. Qh5 { [%eval -0.5] [%clk 0:09:59] } 2... Nc6 { [%eval -6.2] [%clk 0:09:00] } 3. Bc4 { [%eval -7.0] [%clk 0:00:05] } 3... g6 { [%eval 150.0] [%clk 0:00:08] } 0-1"#;

    #[test]
    fn test_same_side_clock_deltas() {
        let game = parse_game(0, CLOCKED).unwrap();
        let timing = analyze_game_time(&game, 5).unwrap();
        assert_eq!(timing.moves.len(), 6);
        // 600 + 5 - 598
        assert_eq!(timing.moves[0].time_spent_seconds, 7.0);
        // 598 + 5 - 599
        assert_eq!(timing.moves[2].time_spent_seconds, 4.0);
        assert_eq!(timing.moves[3].eval_before, Some(-0.5));
        assert_eq!(timing.critical_scramble.white, 1);
        assert_eq!(timing.critical_scramble.black, 1);
        assert_eq!(timing.zeitnot.total(), 2);
    }

    #[test]
    fn test_no_clock_data() {
        let game = parse_game(0, "1. e4 e5 2. Nf3 *").unwrap();
        assert!(analyze_game_time(&game, 45).is_none());
        let awards = analyze_round_time(&[&game], 45);
        assert_eq!(awards, TimeAwards::default());
    }

    #[test]
    fn test_round_awards() {
        let game = parse_game(0, CLOCKED).unwrap();
        let awards = analyze_round_time(&[&game], 5);

        let think = awards.longest_think.unwrap();
        assert_eq!(think.color, Side::White);
        assert_eq!(think.time_spent, 599.0);
        assert_eq!(think.move_number, 3);

        let survivor = awards.time_scramble_survivor.unwrap();
        assert_eq!(survivor.player, "Bo");
        assert_eq!(survivor.min_clock, 8.0);

        let sniper = awards.sniper.unwrap();
        assert_eq!(sniper.san, "g6");
        assert_eq!(sniper.eval_after, 150.0);

        let sad = awards.sad_times.unwrap();
        assert_eq!(sad.color, Side::White);
        assert_eq!(sad.eval, -6.2);

        assert!(awards.bullet_speed.is_none());
        assert_eq!(awards.summary.unwrap().games_with_timescramble, 1);
    }
}
