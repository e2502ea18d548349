//! Team totals and team awards for leagues that publish a roster.

use std::collections::BTreeMap;

use chess_core::{MoveAnnotation, ParsedGame, PieceKind, Side};
use serde::{Deserialize, Serialize};
use shakmaty::Square;
use tracing::debug;

use crate::error::StatsError;
use crate::round1;
use crate::season::normalizer::normalize_player;

/// Knight moves after this full move count as "late".
const LATE_KNIGHT_MOVE: usize = 30;
const CORNERS: [Square; 4] = [Square::A1, Square::A8, Square::H1, Square::H8];

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RosterEntry {
    Players(Vec<String>),
    Team { players: Vec<String> },
}

/// Team name to players, with a reverse index on normalized names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    teams: BTreeMap<String, Vec<String>>,
    by_player: BTreeMap<String, String>,
}

impl Roster {
    pub fn new(teams: BTreeMap<String, Vec<String>>) -> Result<Self, StatsError> {
        let mut by_player = BTreeMap::new();
        for (team, players) in &teams {
            for player in players {
                let key = normalize_player(player);
                if let Some(other) = by_player.insert(key.clone(), team.clone()) {
                    if &other != team {
                        return Err(StatsError::InvalidRoster(format!(
                            "{key} is listed for both {other} and {team}"
                        )));
                    }
                }
            }
        }
        Ok(Self { teams, by_player })
    }

    /// Accepts `{"Team": ["A", "B"]}` or `{"Team": {"players": ["A", "B"]}}`.
    pub fn from_json(text: &str) -> Result<Self, StatsError> {
        let raw: BTreeMap<String, RosterEntry> = serde_json::from_str(text)?;
        let teams = raw
            .into_iter()
            .map(|(team, entry)| match entry {
                RosterEntry::Players(players) | RosterEntry::Team { players } => (team, players),
            })
            .collect();
        Self::new(teams)
    }

    pub fn team_of(&self, player: &str) -> Option<&str> {
        self.by_player
            .get(&normalize_player(player))
            .map(String::as_str)
    }

    pub fn player_count(&self, team: &str) -> usize {
        self.teams.get(team).map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub name: String,
    pub player_count: usize,
    pub total_games: u32,
    /// Moves made by the team's players.
    pub total_moves: u32,
    pub total_captures: u32,
    pub pawn_captures: u32,
    pub late_knight_moves: u32,
    /// Full move of each first castle.
    pub castling_move_numbers: Vec<usize>,
    pub pieces_in_enemy_half: u32,
    pub checks_delivered: u32,
    pub corner_activity: u32,
    pub retreating_moves: u32,
    pub promotions: u32,
    pub average_game_length: f64,
    pub average_castling_move: Option<f64>,
}

impl TeamStats {
    fn new(name: &str, player_count: usize) -> Self {
        Self {
            name: name.to_string(),
            player_count,
            ..Default::default()
        }
    }

    fn add_move(&mut self, m: &MoveAnnotation) {
        self.total_moves += 1;
        if m.is_capture() {
            self.total_captures += 1;
            if m.piece == PieceKind::Pawn {
                self.pawn_captures += 1;
            }
        }
        if m.piece == PieceKind::Knight && m.move_number_full() > LATE_KNIGHT_MOVE {
            self.late_knight_moves += 1;
        }
        if m.gives_check() {
            self.checks_delivered += 1;
        }
        if m.promotion.is_some() {
            self.promotions += 1;
        }
        if CORNERS.contains(&m.from) || CORNERS.contains(&m.to) {
            self.corner_activity += 1;
        }

        let (from, to) = (u32::from(m.from.rank()), u32::from(m.to.rank()));
        let (invading, retreating) = match m.color {
            Side::White => (to >= 4, to < from),
            Side::Black => (to <= 3, to > from),
        };
        if invading {
            self.pieces_in_enemy_half += 1;
        }
        if retreating {
            self.retreating_moves += 1;
        }
    }

    fn finish(&mut self) {
        if self.total_games > 0 {
            self.average_game_length =
                round1(f64::from(self.total_moves) / f64::from(self.total_games));
        }
        if !self.castling_move_numbers.is_empty() {
            let sum: usize = self.castling_move_numbers.iter().sum();
            self.average_castling_move =
                Some(round1(sum as f64 / self.castling_move_numbers.len() as f64));
        }
    }

    fn per_game(&self, value: u32) -> f64 {
        round1(f64::from(value) / f64::from(self.total_games))
    }
}

/// One team award. `value` is the stat the award was decided on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAward {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub average_per_game: Option<f64>,
    pub player_count: usize,
    pub total_games: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamAwards {
    pub bloodthirsty_team: Option<TeamAward>,
    pub late_knight_show: Option<TeamAward>,
    pub pawn_crackers: Option<TeamAward>,
    pub castling_speed: Option<TeamAward>,
    pub space_invaders: Option<TeamAward>,
    pub check_masters: Option<TeamAward>,
    pub corner_conquerors: Option<TeamAward>,
    pub marathon_runners: Option<TeamAward>,
    pub speed_demons: Option<TeamAward>,
    pub chicken_team: Option<TeamAward>,
    pub non_chicken_team: Option<TeamAward>,
    pub promotion_party: Option<TeamAward>,
}

impl TeamAwards {
    /// Award key, display name, whether a higher value is better, and the award.
    pub fn entries(&self) -> [(&'static str, &'static str, bool, Option<&TeamAward>); 12] {
        [
            ("bloodthirstyTeam", "Bloodthirsty Team", true, self.bloodthirsty_team.as_ref()),
            ("lateKnightShow", "The Late Knight Show", true, self.late_knight_show.as_ref()),
            ("pawnCrackers", "Pawn Crackers", true, self.pawn_crackers.as_ref()),
            ("castlingSpeed", "Castling Speed", false, self.castling_speed.as_ref()),
            ("spaceInvaders", "Space Invaders", true, self.space_invaders.as_ref()),
            ("checkMasters", "Check Masters", true, self.check_masters.as_ref()),
            ("cornerConquerors", "Corner Conquerors", true, self.corner_conquerors.as_ref()),
            ("marathonRunners", "Marathon Runners", true, self.marathon_runners.as_ref()),
            ("speedDemons", "Speed Demons", false, self.speed_demons.as_ref()),
            ("chickenTeam", "Chicken Team", true, self.chicken_team.as_ref()),
            ("nonChickenTeam", "Non-Chicken Team", false, self.non_chicken_team.as_ref()),
            ("promotionParty", "Promotion Party", true, self.promotion_party.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsSection {
    pub stats: BTreeMap<String, TeamStats>,
    pub awards: TeamAwards,
}

pub fn team_stats(played: &[&ParsedGame], roster: &Roster) -> BTreeMap<String, TeamStats> {
    let mut stats: BTreeMap<String, TeamStats> = roster
        .teams
        .iter()
        .map(|(team, players)| (team.clone(), TeamStats::new(team, players.len())))
        .collect();

    for game in played {
        let (Some(white_team), Some(black_team)) =
            (roster.team_of(game.white()), roster.team_of(game.black()))
        else {
            debug!(game_index = game.index, "Skipping game with unrostered player");
            continue;
        };

        for (side, team) in [(Side::White, white_team), (Side::Black, black_team)] {
            let Some(entry) = stats.get_mut(team) else {
                continue;
            };
            entry.total_games += 1;
            let mut castled = false;
            for m in game.moves.iter().filter(|m| m.color == side) {
                entry.add_move(m);
                if m.is_castle() && !castled {
                    castled = true;
                    entry.castling_move_numbers.push(m.move_number_full());
                }
            }
        }
    }

    for entry in stats.values_mut() {
        entry.finish();
    }
    stats
}

/// Pick the best team by `key`; strictly better only, so the first team in
/// name order wins ties.
fn pick<'a>(
    teams: &[&'a TeamStats],
    higher_is_better: bool,
    key: impl Fn(&TeamStats) -> Option<f64>,
) -> Option<(&'a TeamStats, f64)> {
    let mut best: Option<(&'a TeamStats, f64)> = None;
    for &team in teams {
        let Some(value) = key(team) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((_, incumbent)) if higher_is_better => value > incumbent,
            Some((_, incumbent)) => value < incumbent,
        };
        if better {
            best = Some((team, value));
        }
    }
    best
}

fn counted(
    teams: &[&TeamStats],
    higher_is_better: bool,
    field: impl Fn(&TeamStats) -> u32,
) -> Option<TeamAward> {
    pick(teams, higher_is_better, |t| Some(f64::from(field(t)))).map(|(team, value)| TeamAward {
        name: team.name.clone(),
        value,
        average_per_game: Some(team.per_game(field(team))),
        player_count: team.player_count,
        total_games: team.total_games,
    })
}

fn averaged(
    teams: &[&TeamStats],
    higher_is_better: bool,
    field: impl Fn(&TeamStats) -> Option<f64>,
) -> Option<TeamAward> {
    pick(teams, higher_is_better, field).map(|(team, value)| TeamAward {
        name: team.name.clone(),
        value,
        average_per_game: None,
        player_count: team.player_count,
        total_games: team.total_games,
    })
}

pub fn team_awards(stats: &BTreeMap<String, TeamStats>) -> TeamAwards {
    let teams: Vec<&TeamStats> = stats.values().filter(|t| t.total_games > 0).collect();
    TeamAwards {
        bloodthirsty_team: counted(&teams, true, |t| t.total_captures),
        late_knight_show: counted(&teams, true, |t| t.late_knight_moves),
        pawn_crackers: counted(&teams, true, |t| t.pawn_captures),
        castling_speed: averaged(&teams, false, |t| t.average_castling_move),
        space_invaders: counted(&teams, true, |t| t.pieces_in_enemy_half),
        check_masters: counted(&teams, true, |t| t.checks_delivered),
        corner_conquerors: counted(&teams, true, |t| t.corner_activity),
        marathon_runners: averaged(&teams, true, |t| Some(t.average_game_length)),
        speed_demons: averaged(&teams, false, |t| Some(t.average_game_length)),
        chicken_team: counted(&teams, true, |t| t.retreating_moves),
        non_chicken_team: counted(&teams, false, |t| t.retreating_moves),
        promotion_party: counted(&teams, true, |t| t.promotions),
    }
}

pub fn teams_section(played: &[&ParsedGame], roster: &Roster) -> TeamsSection {
    let stats = team_stats(played, roster);
    let awards = team_awards(&stats);
    TeamsSection { stats, awards }
}
