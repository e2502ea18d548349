//! Season aggregation over saved round documents.

pub mod aggregates;
pub mod award_frequency;
pub mod catalog;
pub mod hall_of_fame;
pub mod leaderboards;
pub mod loader;
pub mod normalizer;
pub mod players;
pub mod trends;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::round::RoundDocument;
use aggregates::SeasonAggregates;
use award_frequency::AwardFrequency;
use hall_of_fame::{HallOfFame, TeamHallEntry};
use leaderboards::Leaderboards;
use players::PlayerStats;
use trends::Trends;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDocument {
    pub season_number: u32,
    pub generated_at: DateTime<Utc>,
    pub rounds_included: Vec<u32>,
    pub aggregates: SeasonAggregates,
    pub hall_of_fame: HallOfFame,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub team_hall_of_fame: Option<BTreeMap<String, TeamHallEntry>>,
    /// Keyed by normalized player name.
    pub player_stats: BTreeMap<String, PlayerStats>,
    pub leaderboards: Leaderboards,
    pub trends: Trends,
    pub award_frequency: AwardFrequency,
}

/// Build the season document from `rounds`. Rounds are put in round order
/// first, so the result does not depend on the order they were loaded in.
pub fn build_season(
    season: u32,
    rounds: &[RoundDocument],
    generated_at: DateTime<Utc>,
) -> SeasonDocument {
    let mut ordered: Vec<&RoundDocument> = rounds.iter().collect();
    ordered.sort_by_key(|r| r.round_number);
    let rounds: Vec<RoundDocument> = ordered.into_iter().cloned().collect();

    let player_stats = players::player_stats(&rounds);
    info!(
        season,
        rounds = rounds.len(),
        players = player_stats.len(),
        "Aggregating season"
    );

    SeasonDocument {
        season_number: season,
        generated_at,
        rounds_included: rounds.iter().map(|r| r.round_number).collect(),
        aggregates: aggregates::season_aggregates(&rounds),
        hall_of_fame: hall_of_fame::hall_of_fame(&rounds),
        team_hall_of_fame: hall_of_fame::team_hall_of_fame(&rounds),
        leaderboards: leaderboards::leaderboards(&player_stats),
        player_stats,
        trends: trends::trends(&rounds),
        award_frequency: award_frequency::award_frequency(&rounds),
    }
}
