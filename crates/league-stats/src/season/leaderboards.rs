//! Top-ten lists over the season's player records.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::players::{AwardEntry, PlayerStats};
use crate::round1;

const TOP: usize = 10;
/// Games needed to appear on most boards.
const ACTIVE_GAMES: u32 = 3;
/// Games needed for the consistency and win-rate boards.
const ESTABLISHED_GAMES: u32 = 5;
/// Round slots compared at each end of the season for improvement.
const IMPROVEMENT_WINDOW: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardsEntry {
    pub player: String,
    pub display_name: String,
    pub count: usize,
    pub awards: Vec<AwardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcplEntry {
    pub player: String,
    pub display_name: String,
    pub acpl: f64,
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementEntry {
    pub player: String,
    pub display_name: String,
    #[serde(rename = "earlyACPL")]
    pub early_acpl: f64,
    #[serde(rename = "lateACPL")]
    pub late_acpl: f64,
    pub improvement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesEntry {
    pub player: String,
    pub display_name: String,
    pub games: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersatilityEntry {
    pub player: String,
    pub display_name: String,
    pub openings_used: usize,
    pub openings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyEntry {
    pub player: String,
    pub display_name: String,
    #[serde(rename = "averageACPL")]
    pub average_acpl: Option<f64>,
    pub variance: f64,
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRateEntry {
    pub player: String,
    pub display_name: String,
    pub win_rate: f64,
    pub wins: u32,
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlundersEntry {
    pub player: String,
    pub display_name: String,
    pub blunders: u32,
    pub blunders_per_game: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Leaderboards {
    pub most_awards: Vec<AwardsEntry>,
    #[serde(rename = "bestAverageACPL")]
    pub best_average_acpl: Vec<AcplEntry>,
    #[serde(rename = "worstAverageACPL")]
    pub worst_average_acpl: Vec<AcplEntry>,
    pub most_improved: Vec<ImprovementEntry>,
    pub most_games: Vec<GamesEntry>,
    pub most_versatile: Vec<VersatilityEntry>,
    pub most_consistent: Vec<ConsistencyEntry>,
    pub highest_win_rate: Vec<WinRateEntry>,
    pub most_blunders: Vec<BlundersEntry>,
    pub fewest_blunders: Vec<BlundersEntry>,
}

/// Stable sort by `key`, best first, cut to the top ten.
fn top<T, K>(
    mut entries: Vec<T>,
    key: impl Fn(&T) -> K,
    order: fn(&K, &K) -> Ordering,
) -> Vec<T> {
    entries.sort_by(|a, b| order(&key(a), &key(b)));
    entries.truncate(TOP);
    entries
}

fn ascending(a: &f64, b: &f64) -> Ordering {
    a.total_cmp(b)
}

fn descending(a: &f64, b: &f64) -> Ordering {
    b.total_cmp(a)
}

fn most<K: Ord>(a: &K, b: &K) -> Ordering {
    b.cmp(a)
}

fn window_mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    (!present.is_empty()).then(|| present.iter().sum::<f64>() / present.len() as f64)
}

fn improvement(p: &PlayerStats) -> Option<ImprovementEntry> {
    let series = &p.acpl_by_round;
    let early = window_mean(&series[..series.len().min(IMPROVEMENT_WINDOW)])?;
    let late = window_mean(&series[series.len().saturating_sub(IMPROVEMENT_WINDOW)..])?;
    let improvement = round1(early - late);
    (improvement > 0.0).then(|| ImprovementEntry {
        player: p.normalized_name.clone(),
        display_name: p.display_name.clone(),
        early_acpl: round1(early),
        late_acpl: round1(late),
        improvement,
    })
}

fn blunders(p: &PlayerStats) -> Option<BlundersEntry> {
    Some(BlundersEntry {
        player: p.normalized_name.clone(),
        display_name: p.display_name.clone(),
        blunders: p.total_blunders,
        blunders_per_game: p.blunders_per_game()?,
    })
}

fn acpl(p: &PlayerStats) -> Option<AcplEntry> {
    Some(AcplEntry {
        player: p.normalized_name.clone(),
        display_name: p.display_name.clone(),
        acpl: p.average_acpl?,
        games_played: p.games_played,
    })
}

/// Ties keep the players' name order.
pub fn leaderboards(players: &BTreeMap<String, PlayerStats>) -> Leaderboards {
    let all: Vec<&PlayerStats> = players.values().collect();
    let active: Vec<&PlayerStats> = all
        .iter()
        .copied()
        .filter(|p| p.games_played >= ACTIVE_GAMES)
        .collect();
    let established = || {
        active
            .iter()
            .copied()
            .filter(|p| p.games_played >= ESTABLISHED_GAMES)
    };

    let most_awards: Vec<AwardsEntry> = all
        .iter()
        .filter(|p| p.award_count > 0)
        .map(|p| AwardsEntry {
            player: p.normalized_name.clone(),
            display_name: p.display_name.clone(),
            count: p.award_count,
            awards: p.awards.clone(),
        })
        .collect();

    let acpl_entries: Vec<AcplEntry> = active.iter().filter_map(|p| acpl(p)).collect();

    let most_games: Vec<GamesEntry> = all
        .iter()
        .map(|p| GamesEntry {
            player: p.normalized_name.clone(),
            display_name: p.display_name.clone(),
            games: p.games_played,
        })
        .collect();

    let most_versatile: Vec<VersatilityEntry> = active
        .iter()
        .filter(|p| p.opening_diversity > 0)
        .map(|p| VersatilityEntry {
            player: p.normalized_name.clone(),
            display_name: p.display_name.clone(),
            openings_used: p.opening_diversity,
            openings: p.openings_used.clone(),
        })
        .collect();

    let most_consistent: Vec<ConsistencyEntry> = established()
        .filter_map(|p| {
            Some(ConsistencyEntry {
                player: p.normalized_name.clone(),
                display_name: p.display_name.clone(),
                average_acpl: p.average_acpl,
                variance: p.acpl_variance?,
                games_played: p.games_played,
            })
        })
        .collect();

    let highest_win_rate: Vec<WinRateEntry> = established()
        .map(|p| WinRateEntry {
            player: p.normalized_name.clone(),
            display_name: p.display_name.clone(),
            win_rate: p.win_rate,
            wins: p.wins,
            games_played: p.games_played,
        })
        .collect();

    let blunder_entries: Vec<BlundersEntry> = active.iter().filter_map(|p| blunders(p)).collect();

    Leaderboards {
        most_awards: top(most_awards, |e: &AwardsEntry| e.count, most),
        best_average_acpl: top(acpl_entries.clone(), |e: &AcplEntry| e.acpl, ascending),
        worst_average_acpl: top(acpl_entries, |e: &AcplEntry| e.acpl, descending),
        most_improved: top(
            active.iter().filter_map(|p| improvement(p)).collect(),
            |e: &ImprovementEntry| e.improvement,
            descending,
        ),
        most_games: top(most_games, |e: &GamesEntry| e.games, most),
        most_versatile: top(most_versatile, |e: &VersatilityEntry| e.openings_used, most),
        most_consistent: top(most_consistent, |e: &ConsistencyEntry| e.variance, ascending),
        highest_win_rate: top(highest_win_rate, |e: &WinRateEntry| e.win_rate, descending),
        most_blunders: top(
            blunder_entries
                .iter()
                .filter(|e| e.blunders > 0)
                .cloned()
                .collect(),
            |e: &BlundersEntry| e.blunders,
            most,
        ),
        fewest_blunders: top(
            blunder_entries,
            |e: &BlundersEntry| e.blunders_per_game,
            ascending,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, games: u32) -> PlayerStats {
        PlayerStats {
            normalized_name: name.to_string(),
            display_name: name.to_string(),
            games_played: games,
            ..Default::default()
        }
    }

    fn board(players: Vec<PlayerStats>) -> BTreeMap<String, PlayerStats> {
        players
            .into_iter()
            .map(|p| (p.normalized_name.clone(), p))
            .collect()
    }

    #[test]
    fn test_acpl_boards_need_three_games() {
        let mut ann = player("Ann", 2);
        ann.average_acpl = Some(5.0);
        let mut bo = player("Bo", 3);
        bo.average_acpl = Some(40.0);
        let mut cy = player("Cy", 4);
        cy.average_acpl = Some(20.0);

        let lb = leaderboards(&board(vec![ann, bo, cy]));
        let best: Vec<&str> = lb.best_average_acpl.iter().map(|e| e.player.as_str()).collect();
        assert_eq!(best, vec!["Cy", "Bo"]);
        assert_eq!(lb.worst_average_acpl[0].player, "Bo");
        assert_eq!(lb.most_games[0].player, "Cy");
        assert_eq!(lb.most_games.len(), 3);
    }

    #[test]
    fn test_ties_keep_name_order() {
        let lb = leaderboards(&board(vec![player("Zed", 4), player("Abe", 4)]));
        assert_eq!(lb.most_games[0].player, "Abe");
        assert_eq!(lb.most_games[1].player, "Zed");
    }

    #[test]
    fn test_most_improved_compares_season_ends() {
        let mut ann = player("Ann", 6);
        ann.acpl_by_round = vec![Some(60.0), None, Some(40.0), Some(30.0), None, Some(20.0)];
        let mut bo = player("Bo", 6);
        bo.acpl_by_round = [10.0, 10.0, 10.0, 30.0, 30.0, 30.0].map(Some).to_vec();

        let lb = leaderboards(&board(vec![ann, bo]));
        assert_eq!(lb.most_improved.len(), 1);
        let entry = &lb.most_improved[0];
        assert_eq!(entry.player, "Ann");
        assert_eq!(entry.early_acpl, 50.0);
        assert_eq!(entry.late_acpl, 25.0);
        assert_eq!(entry.improvement, 25.0);
    }

    #[test]
    fn test_win_rate_needs_five_games() {
        let mut ann = player("Ann", 4);
        ann.win_rate = 100.0;
        let mut bo = player("Bo", 5);
        bo.win_rate = 40.0;
        let lb = leaderboards(&board(vec![ann, bo]));
        assert_eq!(lb.highest_win_rate.len(), 1);
        assert_eq!(lb.highest_win_rate[0].player, "Bo");
    }

    #[test]
    fn test_blunder_boards_skip_unanalysed_players() {
        let mut ann = player("Ann", 3);
        ann.total_blunders = 6;
        ann.analyzed_games = 3;
        let bo = player("Bo", 3);
        let lb = leaderboards(&board(vec![ann, bo]));
        assert_eq!(lb.most_blunders.len(), 1);
        assert_eq!(lb.most_blunders[0].blunders_per_game, 2.0);
        assert_eq!(lb.fewest_blunders.len(), 1);
    }
}
