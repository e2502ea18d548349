//! How often each fun award was handed out across the season.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{fun_award_wins, FUN_AWARDS};
use crate::round::RoundDocument;
use crate::{percent, round1};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frequency {
    pub display_name: String,
    /// Rounds in which the award had a winner.
    pub appearances: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyedFrequency {
    pub key: String,
    #[serde(flatten)]
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwardFrequency {
    pub frequency: BTreeMap<String, Frequency>,
    pub most_common: Option<KeyedFrequency>,
    pub least_common: Option<KeyedFrequency>,
    pub never_occurred: Vec<String>,
    pub sorted_by_frequency: Vec<KeyedFrequency>,
    pub total_rounds: usize,
}

pub fn award_frequency(rounds: &[RoundDocument]) -> AwardFrequency {
    let total_rounds = rounds.len();
    let mut appearances: BTreeMap<&str, usize> = BTreeMap::new();
    for round in rounds {
        for win in fun_award_wins(&round.fun_stats) {
            *appearances.entry(win.key).or_default() += 1;
        }
    }

    // Catalogue order; ties keep it.
    let keyed: Vec<KeyedFrequency> = FUN_AWARDS
        .iter()
        .map(|&(key, display)| {
            let count = appearances.get(key).copied().unwrap_or(0);
            KeyedFrequency {
                key: key.to_string(),
                frequency: Frequency {
                    display_name: display.to_string(),
                    appearances: count,
                    percentage: round1(percent(count, total_rounds)),
                },
            }
        })
        .collect();

    let mut most_common: Option<&KeyedFrequency> = None;
    let mut least_common: Option<&KeyedFrequency> = None;
    for entry in &keyed {
        let n = entry.frequency.appearances;
        if n > most_common.map_or(0, |m| m.frequency.appearances) {
            most_common = Some(entry);
        }
        if n > 0 && least_common.map_or(true, |l| n < l.frequency.appearances) {
            least_common = Some(entry);
        }
    }

    let mut sorted_by_frequency = keyed.clone();
    sorted_by_frequency.sort_by(|a, b| b.frequency.appearances.cmp(&a.frequency.appearances));

    AwardFrequency {
        frequency: keyed
            .iter()
            .map(|e| (e.key.clone(), e.frequency.clone()))
            .collect(),
        most_common: most_common.cloned(),
        least_common: least_common.cloned(),
        never_occurred: keyed
            .iter()
            .filter(|e| e.frequency.appearances == 0)
            .map(|e| e.key.clone())
            .collect(),
        sorted_by_frequency,
        total_rounds,
    }
}
