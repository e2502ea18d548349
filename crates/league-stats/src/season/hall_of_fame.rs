//! Season-best records across rounds. Rounds are visited in order and only a
//! strictly better record displaces the incumbent.

use std::collections::BTreeMap;

use chess_analyzers::analyzers::capture_sequence::SequenceRecord;
use chess_analyzers::analyzers::castling::CastlingRaceRecord;
use chess_analyzers::analyzers::opening_hipster::HipsterRecord;
use chess_analyzers::analyzers::side_counts::{DistanceRecord, RetreatsRecord};
use chess_analyzers::records::Extremum;
use chess_core::Side;
use serde::{Deserialize, Serialize};

use crate::reports::{
    CombinedAcplRecord, PerformanceRecord, SummaryBlunder, SummaryComeback, SummaryEscape,
};
use crate::round::overview::GameLength;
use crate::round::teams::TeamAward;
use crate::round::RoundDocument;

/// Board squares are assumed 5.5 cm wide.
const SQUARE_CM: f64 = 5.5;
/// Manhattan distance overstates diagonal travel.
const DIAGONAL_CORRECTION: f64 = 0.82;
/// Scale from a 9.5 cm queen to a 1.76 m human.
const HUMAN_SCALE: f64 = 18.54;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HallEntry<T> {
    pub round: u32,
    #[serde(flatten)]
    pub record: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportiestQueen {
    pub distance_cm: u64,
    pub distance_human_scale_m: u64,
    #[serde(flatten)]
    pub record: DistanceRecord,
}

impl SportiestQueen {
    pub fn new(record: DistanceRecord) -> Self {
        let cm = f64::from(record.distance) * DIAGONAL_CORRECTION * SQUARE_CM;
        Self {
            distance_cm: cm.round() as u64,
            distance_human_scale_m: (cm * HUMAN_SCALE / 100.0).round() as u64,
            record,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HallOfFame {
    pub cleanest_game: Option<HallEntry<CombinedAcplRecord>>,
    pub wildest_game: Option<HallEntry<CombinedAcplRecord>>,
    pub biggest_blunder: Option<HallEntry<SummaryBlunder>>,
    pub most_accurate: Option<HallEntry<PerformanceRecord>>,
    #[serde(rename = "worstACPL")]
    pub worst_acpl: Option<HallEntry<PerformanceRecord>>,
    pub biggest_comeback: Option<HallEntry<SummaryComeback>>,
    pub lucky_escape: Option<HallEntry<SummaryEscape>>,
    pub longest_game: Option<HallEntry<GameLength>>,
    pub shortest_game: Option<HallEntry<GameLength>>,
    pub sportiest_queen: Option<HallEntry<SportiestQueen>>,
    pub most_retreats: Option<HallEntry<RetreatsRecord>>,
    pub longest_check_sequence: Option<HallEntry<SequenceRecord>>,
    pub longest_capture_spree: Option<HallEntry<SequenceRecord>>,
    pub earliest_castling: Option<HallEntry<CastlingRaceRecord>>,
    pub most_obscure_opening: Option<HallEntry<HipsterRecord>>,
}

/// Best team award of the season, per award key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamHallEntry {
    pub award: String,
    pub round: u32,
    #[serde(flatten)]
    pub record: TeamAward,
}

fn entry<T>(round: u32, record: T) -> HallEntry<T> {
    HallEntry { round, record }
}

pub fn hall_of_fame(rounds: &[RoundDocument]) -> HallOfFame {
    let mut cleanest = Extremum::min();
    let mut wildest = Extremum::max();
    let mut blunder = Extremum::max();
    let mut accurate = Extremum::max();
    let mut worst_acpl = Extremum::max();
    let mut comeback = Extremum::max();
    let mut escape = Extremum::max();
    let mut longest = Extremum::max();
    let mut shortest = Extremum::min();
    let mut queen = Extremum::max();
    let mut retreats = Extremum::max();
    let mut checks = Extremum::max();
    let mut captures = Extremum::max();
    let mut castling = Extremum::min();
    let mut obscure = Extremum::max();

    for round in rounds {
        let r = round.round_number;

        for game in round.analysis.iter().flat_map(|a| &a.games) {
            let combined = game.combined_acpl();
            let record = || {
                entry(
                    r,
                    CombinedAcplRecord {
                        combined_acpl: combined,
                        white_acpl: game.white_acpl,
                        black_acpl: game.black_acpl,
                        game: game.game.clone(),
                    },
                )
            };
            cleanest.offer(combined, record);
            wildest.offer(combined, record);

            for side in Side::BOTH {
                let performance = || {
                    entry(
                        r,
                        PerformanceRecord {
                            player: game.game.player(side).to_string(),
                            color: side,
                            accuracy: game.accuracy(side),
                            acpl: game.acpl(side),
                            game: game.game.clone(),
                        },
                    )
                };
                accurate.offer(game.accuracy(side), performance);
                worst_acpl.offer(game.acpl(side), performance);
            }

            if let Some(b) = &game.biggest_blunder {
                blunder.offer(b.cp_loss, || {
                    entry(
                        r,
                        SummaryBlunder {
                            player: game.game.player(b.color).to_string(),
                            blunder: b.clone(),
                            game: game.game.clone(),
                        },
                    )
                });
            }
            if let Some(c) = &game.biggest_comeback {
                comeback.offer(c.swing, || {
                    entry(
                        r,
                        SummaryComeback {
                            player: game.game.player(c.color).to_string(),
                            comeback: c.clone(),
                            game: game.game.clone(),
                        },
                    )
                });
            }
            if let Some(e) = &game.lucky_escape {
                escape.offer(e.escape_amount, || {
                    entry(
                        r,
                        SummaryEscape {
                            player: game.game.player(e.color).to_string(),
                            escape: e.clone(),
                            game: game.game.clone(),
                        },
                    )
                });
            }
        }

        if let Some(g) = &round.overview.longest_game {
            longest.offer(g.moves, || entry(r, g.clone()));
        }
        if let Some(g) = &round.overview.shortest_game {
            shortest.offer(g.moves, || entry(r, g.clone()));
        }

        let fun = &round.fun_stats;
        if let Some(q) = &fun.sporty_queen {
            queen.offer(q.distance, || entry(r, SportiestQueen::new(q.clone())));
        }
        if let Some(c) = &fun.chicken_award {
            retreats.offer(c.retreats, || entry(r, c.clone()));
        }
        if let Some(s) = &fun.longest_check_sequence {
            checks.offer(s.length, || entry(r, s.clone()));
        }
        if let Some(s) = &fun.longest_capture_sequence {
            captures.offer(s.length, || entry(r, s.clone()));
        }
        if let Some(c) = &fun.castling_race {
            castling.offer(c.moves, || entry(r, c.clone()));
        }
        if let Some(h) = &fun.opening_hipster {
            obscure.offer(h.obscurity_score, || entry(r, h.clone()));
        }
    }

    HallOfFame {
        cleanest_game: cleanest.into_record(),
        wildest_game: wildest.into_record(),
        biggest_blunder: blunder.into_record(),
        most_accurate: accurate.into_record(),
        worst_acpl: worst_acpl.into_record(),
        biggest_comeback: comeback.into_record(),
        lucky_escape: escape.into_record(),
        longest_game: longest.into_record(),
        shortest_game: shortest.into_record(),
        sportiest_queen: queen.into_record(),
        most_retreats: retreats.into_record(),
        longest_check_sequence: checks.into_record(),
        longest_capture_spree: captures.into_record(),
        earliest_castling: castling.into_record(),
        most_obscure_opening: obscure.into_record(),
    }
}

/// Season-best team awards, or `None` when no round carried team data.
pub fn team_hall_of_fame(rounds: &[RoundDocument]) -> Option<BTreeMap<String, TeamHallEntry>> {
    let mut best: BTreeMap<&'static str, Extremum<f64, TeamHallEntry>> = BTreeMap::new();
    let mut any = false;

    for round in rounds {
        let Some(teams) = &round.teams else {
            continue;
        };
        any = true;
        for (key, display, higher, award) in teams.awards.entries() {
            let Some(award) = award else {
                continue;
            };
            let slot = best.entry(key).or_insert_with(|| {
                if higher {
                    Extremum::max()
                } else {
                    Extremum::min()
                }
            });
            slot.offer(award.value, || TeamHallEntry {
                award: display.to_string(),
                round: round.round_number,
                record: award.clone(),
            });
        }
    }

    any.then(|| {
        best.into_iter()
            .filter_map(|(key, ext)| ext.into_record().map(|e| (key.to_string(), e)))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analyzers::GameRef;

    #[test]
    fn test_sportiest_queen_scaling() {
        let q = SportiestQueen::new(DistanceRecord {
            distance: 100,
            color: Side::White,
            game: GameRef {
                game_index: 0,
                game_id: None,
                white: "A".into(),
                black: "B".into(),
            },
        });
        // 100 * 0.82 * 5.5 = 451 cm; * 18.54 / 100 = 83.6 m
        assert_eq!(q.distance_cm, 451);
        assert_eq!(q.distance_human_scale_m, 84);
    }
}
