//! Per-player season records, keyed by normalized identity.

use std::collections::BTreeMap;

use chess_core::{GameResult, Side};
use serde::{Deserialize, Serialize};

use super::catalog::{display_name, fun_award_wins, other_award_wins, AwardWin};
use super::normalizer::normalize_player;
use crate::round::RoundDocument;
use crate::{percent, round1};

/// Samples needed before the ACPL spread is reported.
const MIN_VARIANCE_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardEntry {
    pub round: u32,
    pub award: String,
    pub award_key: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub normalized_name: String,
    pub display_name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
    pub awards: Vec<AwardEntry>,
    pub award_count: usize,
    /// Aligned with the season's included rounds.
    #[serde(rename = "acplByRound")]
    pub acpl_by_round: Vec<Option<f64>>,
    pub accuracy_by_round: Vec<Option<f64>>,
    #[serde(rename = "averageACPL")]
    pub average_acpl: Option<f64>,
    #[serde(rename = "bestACPL")]
    pub best_acpl: Option<f64>,
    #[serde(rename = "worstACPL")]
    pub worst_acpl: Option<f64>,
    /// Standard deviation of per-game ACPL.
    #[serde(rename = "acplVariance")]
    pub acpl_variance: Option<f64>,
    pub average_accuracy: Option<f64>,
    /// ECO codes, sorted.
    pub openings_used: Vec<String>,
    pub opening_diversity: usize,
    pub favorite_opening: Option<String>,
    pub total_blunders: u32,
    pub total_mistakes: u32,
    pub analyzed_games: u32,
}

impl PlayerStats {
    pub fn blunders_per_game(&self) -> Option<f64> {
        (self.analyzed_games > 0)
            .then(|| round1(f64::from(self.total_blunders) / f64::from(self.analyzed_games)))
    }
}

#[derive(Debug, Default)]
struct Tracker {
    display_name: String,
    games: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    awards: Vec<AwardEntry>,
    acpl: Vec<f64>,
    accuracy: Vec<f64>,
    acpl_by_round: BTreeMap<u32, Vec<f64>>,
    accuracy_by_round: BTreeMap<u32, Vec<f64>>,
    openings: Vec<String>,
    blunders: u32,
    mistakes: u32,
    analyzed: u32,
}

#[derive(Default)]
struct Players(BTreeMap<String, Tracker>);

impl Players {
    /// The tracker for `raw`, remembering `raw` as the latest display form.
    fn get(&mut self, raw: &str) -> &mut Tracker {
        let tracker = self.0.entry(normalize_player(raw)).or_default();
        tracker.display_name = raw.trim().to_string();
        tracker
    }

    fn award(&mut self, round: u32, win: &AwardWin) {
        for winner in &win.winners {
            self.get(winner).awards.push(AwardEntry {
                round,
                award: display_name(win.key).to_string(),
                award_key: win.key.to_string(),
                details: win.details.clone(),
            });
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < MIN_VARIANCE_SAMPLES {
        return None;
    }
    let avg = mean(values)?;
    let var = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(round1(var.sqrt()))
}

/// Most used opening; the first one used wins ties.
fn favorite(openings: &[String]) -> Option<String> {
    let mut counts: Vec<(&String, usize)> = Vec::new();
    for eco in openings {
        match counts.iter_mut().find(|(e, _)| *e == eco) {
            Some((_, n)) => *n += 1,
            None => counts.push((eco, 1)),
        }
    }
    let mut best: Option<(&String, usize)> = None;
    for (eco, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((eco, n));
        }
    }
    best.map(|(eco, _)| eco.clone())
}

fn series(by_round: &BTreeMap<u32, Vec<f64>>, rounds: &[u32]) -> Vec<Option<f64>> {
    rounds
        .iter()
        .map(|r| by_round.get(r).and_then(|v| mean(v)).map(round1))
        .collect()
}

impl Tracker {
    fn into_stats(self, normalized_name: String, rounds: &[u32]) -> PlayerStats {
        let mut openings_used = self.openings.clone();
        openings_used.sort();
        openings_used.dedup();

        PlayerStats {
            normalized_name,
            display_name: self.display_name,
            games_played: self.games,
            wins: self.wins,
            losses: self.losses,
            draws: self.draws,
            win_rate: round1(percent(self.wins as usize, self.games as usize)),
            award_count: self.awards.len(),
            awards: self.awards,
            acpl_by_round: series(&self.acpl_by_round, rounds),
            accuracy_by_round: series(&self.accuracy_by_round, rounds),
            average_acpl: mean(&self.acpl).map(round1),
            best_acpl: self.acpl.iter().copied().reduce(f64::min).map(round1),
            worst_acpl: self.acpl.iter().copied().reduce(f64::max).map(round1),
            acpl_variance: std_dev(&self.acpl),
            average_accuracy: mean(&self.accuracy).map(round1),
            opening_diversity: openings_used.len(),
            favorite_opening: favorite(&self.openings),
            openings_used,
            total_blunders: self.blunders,
            total_mistakes: self.mistakes,
            analyzed_games: self.analyzed,
        }
    }
}

fn track_round(players: &mut Players, round: &RoundDocument) {
    let r = round.round_number;

    for game in &round.games {
        for side in Side::BOTH {
            let tracker = players.get(game.game.player(side));
            tracker.games += 1;
            match game.result {
                GameResult::Draw => tracker.draws += 1,
                result if result.winner() == Some(side) => tracker.wins += 1,
                result if result.winner().is_some() => tracker.losses += 1,
                _ => {}
            }
            if let Some(opening) = &game.opening {
                tracker.openings.push(opening.eco.clone());
            }
        }
    }

    for win in fun_award_wins(&round.fun_stats) {
        players.award(r, &win);
    }
    let summary = round.analysis.as_ref().map(|a| &a.summary);
    for win in other_award_wins(&round.awards, summary) {
        players.award(r, &win);
    }

    for game in round.analysis.iter().flat_map(|a| &a.games) {
        for side in Side::BOTH {
            let tracker = players.get(game.game.player(side));
            let (acpl, accuracy) = (game.acpl(side), game.accuracy(side));
            tracker.acpl.push(acpl);
            tracker.accuracy.push(accuracy);
            tracker.acpl_by_round.entry(r).or_default().push(acpl);
            tracker.accuracy_by_round.entry(r).or_default().push(accuracy);
            let quality = game.move_quality(side);
            tracker.blunders += quality.blunders;
            tracker.mistakes += quality.mistakes;
            tracker.analyzed += 1;
        }
    }
}

/// Player records over `rounds`, which must be in round order.
pub fn player_stats(rounds: &[RoundDocument]) -> BTreeMap<String, PlayerStats> {
    let mut players = Players::default();
    for round in rounds {
        track_round(&mut players, round);
    }
    let included: Vec<u32> = rounds.iter().map(|r| r.round_number).collect();
    players
        .0
        .into_iter()
        .map(|(name, tracker)| {
            let stats = tracker.into_stats(name.clone(), &included);
            (name, stats)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev_needs_three_samples() {
        assert_eq!(std_dev(&[10.0, 20.0]), None);
        assert_eq!(std_dev(&[10.0, 20.0, 30.0]), Some(8.2));
    }

    #[test]
    fn test_favorite_keeps_first_on_tie() {
        let used = ["C50", "B20", "B20", "C50", "A00"].map(String::from);
        assert_eq!(favorite(&used).as_deref(), Some("C50"));
        assert_eq!(favorite(&[]), None);
    }

    #[test]
    fn test_series_aligned_with_rounds() {
        let mut by_round = BTreeMap::new();
        by_round.insert(3, vec![10.0, 21.0]);
        assert_eq!(series(&by_round, &[1, 3]), vec![None, Some(15.5)]);
    }
}
