//! One value per included round for each tracked metric; `None` where the
//! round has nothing to measure.

use serde::{Deserialize, Serialize};

use crate::round::RoundDocument;
use crate::round1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trends {
    #[serde(rename = "averageACPLByRound")]
    pub average_acpl_by_round: Vec<Option<f64>>,
    pub average_accuracy_by_round: Vec<Option<f64>>,
    pub blunders_per_game_by_round: Vec<Option<f64>>,
    pub mistakes_per_game_by_round: Vec<Option<f64>>,
    pub average_game_length_by_round: Vec<Option<f64>>,
    pub e4_percentage_by_round: Vec<Option<f64>>,
    pub d4_percentage_by_round: Vec<Option<f64>>,
    pub draw_rate_by_round: Vec<Option<f64>>,
    pub white_win_rate_by_round: Vec<Option<f64>>,
    pub black_win_rate_by_round: Vec<Option<f64>>,
    pub avg_queen_distance_by_round: Vec<Option<f64>>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| round1(sum / n as f64))
}

fn per_game(total: u32, games: usize) -> f64 {
    if games == 0 {
        0.0
    } else {
        round1(f64::from(total) / games as f64)
    }
}

fn first_move_share(round: &RoundDocument, san: &str) -> f64 {
    round1(
        round
            .openings
            .first_moves
            .get(san)
            .map_or(0.0, |m| m.percentage),
    )
}

impl Trends {
    fn push(&mut self, round: &RoundDocument) {
        let games = round.overview.total_games;

        match &round.analysis {
            Some(analysis) => {
                let acpl = analysis.games.iter().flat_map(|g| [g.white_acpl, g.black_acpl]);
                let accuracy = analysis
                    .games
                    .iter()
                    .flat_map(|g| [g.white_accuracy, g.black_accuracy]);
                self.average_acpl_by_round.push(mean(acpl));
                self.average_accuracy_by_round.push(mean(accuracy));
                self.blunders_per_game_by_round
                    .push(Some(per_game(analysis.total_blunders(), games)));
                self.mistakes_per_game_by_round
                    .push(Some(per_game(analysis.total_mistakes(), games)));
            }
            None => {
                self.average_acpl_by_round.push(None);
                self.average_accuracy_by_round.push(None);
                self.blunders_per_game_by_round.push(None);
                self.mistakes_per_game_by_round.push(None);
            }
        }

        self.average_game_length_by_round.push(
            (round.overview.games_with_moves > 0).then(|| round1(round.overview.average_game_length)),
        );
        self.e4_percentage_by_round.push(Some(first_move_share(round, "e4")));
        self.d4_percentage_by_round.push(Some(first_move_share(round, "d4")));

        let results = &round.results;
        self.draw_rate_by_round.push(Some(round1(results.draw_percentage)));
        self.white_win_rate_by_round
            .push(Some(round1(results.white_win_percentage)));
        self.black_win_rate_by_round
            .push(Some(round1(results.black_win_percentage)));

        self.avg_queen_distance_by_round.push(
            round
                .fun_stats
                .sporty_queen
                .as_ref()
                .map(|q| f64::from(q.distance)),
        );
    }
}

/// Trend series over `rounds`, which must be in round order.
pub fn trends(rounds: &[RoundDocument]) -> Trends {
    let mut trends = Trends::default();
    for round in rounds {
        trends.push(round);
    }
    trends
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_nothing() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([10.0, 15.0, 20.05].into_iter()), Some(15.0));
    }

    #[test]
    fn test_per_game() {
        assert_eq!(per_game(3, 0), 0.0);
        assert_eq!(per_game(5, 3), 1.7);
    }
}
