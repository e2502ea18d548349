use std::collections::BTreeMap;

use chess_analyzers::lookup_opening;
use chess_core::{GameResult, ParsedGame};
use serde::{Deserialize, Serialize};

use crate::{percent, round1};

/// Plies that make up a "popular sequence".
const SEQUENCE_PLIES: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstMove {
    pub count: usize,
    pub percentage: f64,
    /// White's score with this first move.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularSequence {
    pub moves: String,
    pub count: usize,
    pub eco: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningStats {
    pub first_moves: BTreeMap<String, FirstMove>,
    pub popular_sequences: Vec<PopularSequence>,
}

pub fn opening_stats(played: &[&ParsedGame]) -> OpeningStats {
    let mut firsts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut sequences: BTreeMap<String, usize> = BTreeMap::new();

    for game in played {
        let Some(first) = game.moves.first() else {
            continue;
        };
        let entry = firsts.entry(first.san.clone()).or_default();
        entry.0 += 1;
        if game.result == GameResult::WhiteWin {
            entry.1 += 1;
        }
        if game.ply_count() >= SEQUENCE_PLIES {
            *sequences
                .entry(game.opening_sequence(SEQUENCE_PLIES).join(" "))
                .or_default() += 1;
        }
    }

    let first_moves = firsts
        .into_iter()
        .map(|(san, (count, wins))| {
            let stats = FirstMove {
                count,
                percentage: round1(percent(count, played.len())),
                win_rate: round1(percent(wins, count)),
            };
            (san, stats)
        })
        .collect();

    let mut popular_sequences: Vec<PopularSequence> = sequences
        .into_iter()
        .map(|(moves, count)| {
            let opening = lookup_opening(&moves.split(' ').collect::<Vec<_>>());
            PopularSequence {
                count,
                eco: opening.map(|o| o.eco.to_string()),
                name: opening.map(|o| o.name.to_string()),
                moves,
            }
        })
        .collect();
    // Count descending, then ECO ascending with unnamed lines last.
    popular_sequences.sort_by(|a, b| {
        b.count.cmp(&a.count).then_with(|| match (&a.eco, &b.eco) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
    });

    OpeningStats {
        first_moves,
        popular_sequences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_first_moves_and_sequences() {
        let games = [
            parse_game(0, "[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 1-0").unwrap(),
            parse_game(1, "[Result \"0-1\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 0-1").unwrap(),
            parse_game(2, "1. d4 d5 2. c4 e6 3. Nc3 Nf6 *").unwrap(),
            parse_game(3, "1. e4 c5 *").unwrap(),
        ];
        let refs: Vec<&ParsedGame> = games.iter().collect();
        let stats = opening_stats(&refs);

        let e4 = &stats.first_moves["e4"];
        assert_eq!(e4.count, 3);
        assert_eq!(e4.percentage, 75.0);
        assert_eq!(e4.win_rate, 33.3);
        assert_eq!(stats.first_moves["d4"].win_rate, 0.0);

        assert_eq!(stats.popular_sequences.len(), 2);
        let top = &stats.popular_sequences[0];
        assert_eq!(top.moves, "e4 e5 Nf3 Nc6 Bb5 a6");
        assert_eq!(top.count, 2);
        assert_eq!(top.eco.as_deref(), Some("C70"));
        assert_eq!(stats.popular_sequences[1].eco.as_deref(), Some("D30"));
    }

    #[test]
    fn test_unnamed_sequences_sort_last() {
        let games = [
            parse_game(0, "1. a4 a5 2. b4 b5 3. c4 c5 *").unwrap(),
            parse_game(1, "1. e4 e5 2. Nf3 Nf6 3. d4 d5 *").unwrap(),
        ];
        let refs: Vec<&ParsedGame> = games.iter().collect();
        let stats = opening_stats(&refs);
        assert_eq!(stats.popular_sequences[0].eco.as_deref(), Some("C42"));
        assert!(stats.popular_sequences[1].eco.is_none());
    }
}
