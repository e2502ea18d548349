//! Round aggregation: every calculator run over one round's parsed games.
//!
//! Games without moves (forfeits) count toward `overview.totalGames`, the
//! results split and the games list, but are left out of every
//! move-derived statistic.

pub mod awards;
pub mod checkmates;
pub mod games;
pub mod heatmap;
pub mod openings;
pub mod overview;
pub mod phases;
pub mod pieces;
pub mod results;
pub mod tactics;
pub mod teams;

use chess_analyzers::{compute_fun_stats, detect_phases, FunStats, PhaseSpan};
use chess_core::{GameParseFailure, ParseOutcome, ParsedGame};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::reports::{AnalysisReport, TacticalReport};
use awards::RoundAwards;
use checkmates::Checkmates;
use games::GameSummary;
use heatmap::BoardHeatmap;
use openings::OpeningStats;
use overview::Overview;
use phases::GamePhases;
use pieces::PieceStats;
use results::Results;
use tactics::Tactics;
use teams::{Roster, TeamsSection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDocument {
    pub season_number: u32,
    pub round_number: u32,
    pub generated_at: DateTime<Utc>,
    pub overview: Overview,
    pub game_phases: GamePhases,
    pub results: Results,
    pub openings: OpeningStats,
    pub tactics: Tactics,
    pub pieces: PieceStats,
    pub checkmates: Checkmates,
    pub board_heatmap: BoardHeatmap,
    pub awards: RoundAwards,
    pub fun_stats: FunStats,
    pub games: Vec<GameSummary>,
    pub parse_errors: Vec<GameParseFailure>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub analysis: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tactical_patterns: Option<TacticalReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub teams: Option<TeamsSection>,
}

/// Collects the optional inputs of a round before building it.
pub struct RoundBuilder<'a> {
    season: u32,
    round: u32,
    increment: u32,
    generated_at: DateTime<Utc>,
    analysis: Option<AnalysisReport>,
    tactical_patterns: Option<TacticalReport>,
    roster: Option<&'a Roster>,
}

impl<'a> RoundBuilder<'a> {
    pub fn new(season: u32, round: u32) -> Self {
        Self {
            season,
            round,
            increment: 0,
            generated_at: Utc::now(),
            analysis: None,
            tactical_patterns: None,
            roster: None,
        }
    }

    /// Clock increment in seconds, used for time spent per move.
    pub fn increment(mut self, seconds: u32) -> Self {
        self.increment = seconds;
        self
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    pub fn analysis(mut self, report: Option<AnalysisReport>) -> Self {
        self.analysis = report;
        self
    }

    pub fn tactical_patterns(mut self, report: Option<TacticalReport>) -> Self {
        self.tactical_patterns = report;
        self
    }

    pub fn roster(mut self, roster: Option<&'a Roster>) -> Self {
        self.roster = roster;
        self
    }

    pub fn build(self, outcome: &ParseOutcome) -> RoundDocument {
        let all: Vec<&ParsedGame> = outcome.games.iter().collect();
        let played: Vec<&ParsedGame> = all.iter().copied().filter(|g| g.has_moves()).collect();
        let spans: Vec<(&ParsedGame, PhaseSpan)> =
            played.iter().map(|&g| (g, detect_phases(g))).collect();

        info!(
            season = self.season,
            round = self.round,
            games = outcome.total_games,
            with_moves = played.len(),
            failed = outcome.errors.len(),
            "Aggregating round"
        );

        RoundDocument {
            season_number: self.season,
            round_number: self.round,
            generated_at: self.generated_at,
            overview: overview::overview(outcome.total_games, &played),
            game_phases: phases::game_phases(&spans),
            results: results::results(&outcome.games),
            openings: openings::opening_stats(&played),
            tactics: tactics::tactics(&played),
            pieces: pieces::piece_stats(&played),
            checkmates: checkmates::checkmates(&played),
            board_heatmap: heatmap::board_heatmap(&played),
            awards: awards::round_awards(&spans),
            fun_stats: compute_fun_stats(&all, self.increment),
            games: games::game_summaries(&outcome.games),
            parse_errors: outcome.errors.clone(),
            analysis: self.analysis,
            tactical_patterns: self.tactical_patterns,
            teams: self.roster.map(|r| teams::teams_section(&played, r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_games;

    const ROUND: &str = "[White \"Ann\"]\n[Black \"Bo\"]\n[Result \"1-0\"]\n\n\
        1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0\n\n\
        [White \"Cy\"]\n[Black \"Di\"]\n[Result \"1/2-1/2\"]\n\n1/2-1/2\n";

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_forfeit_counted_but_not_replayed() {
        let outcome = parse_games(ROUND);
        let doc = RoundBuilder::new(2, 5).generated_at(fixed_time()).build(&outcome);

        assert_eq!(doc.overview.total_games, 2);
        assert_eq!(doc.overview.games_with_moves, 1);
        assert_eq!(doc.results.draws, 1);
        assert_eq!(doc.games.len(), 2);
        assert_eq!(doc.checkmates.fastest.as_ref().unwrap().moves, 4);
        assert!(doc.parse_errors.is_empty());
        assert!(doc.teams.is_none());
    }

    #[test]
    fn test_optional_sections_omitted_from_json() {
        let outcome = parse_games(ROUND);
        let doc = RoundBuilder::new(1, 1).generated_at(fixed_time()).build(&outcome);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("analysis").is_none());
        assert!(json.get("tacticalPatterns").is_none());
        assert_eq!(json["parseErrors"], serde_json::json!([]));
        assert_eq!(json["generatedAt"], "2025-03-01T12:00:00Z");
        assert_eq!(json["seasonNumber"], 1);
    }

    #[test]
    fn test_document_reads_back() {
        let outcome = parse_games(ROUND);
        let doc = RoundBuilder::new(1, 3).generated_at(fixed_time()).build(&outcome);
        let text = serde_json::to_string_pretty(&doc).unwrap();
        let back: RoundDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }
}
