//! Reads saved round documents back from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::StatsError;
use crate::round::RoundDocument;

pub fn round_file_name(season: u32, round: u32) -> String {
    format!("season-{season}-round-{round}.json")
}

pub fn round_path(dir: &Path, season: u32, round: u32) -> PathBuf {
    dir.join(round_file_name(season, round))
}

/// Round number of a `season-S-round-R.json` file name, rejecting
/// companions like `season-S-round-R-analysis.json`.
fn round_number(file_name: &str, season: u32) -> Option<u32> {
    let prefix = format!("season-{season}-round-");
    let digits = file_name.strip_prefix(&prefix)?.strip_suffix(".json")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Round files present for `season`, keyed by round number.
fn discover(dir: &Path, season: u32) -> Result<BTreeMap<u32, PathBuf>, StatsError> {
    let pattern = format!(
        "{}/season-{season}-round-*.json",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut found = BTreeMap::new();
    for entry in glob::glob(&pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Unreadable directory entry");
                continue;
            }
        };
        let number = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| round_number(n, season));
        if let Some(number) = number {
            found.insert(number, path);
        }
    }
    Ok(found)
}

/// Load rounds `1..=max_rounds` of a season, in round order. Missing or
/// unreadable rounds are skipped; it is an error only if none load.
pub fn load_rounds(
    dir: &Path,
    season: u32,
    max_rounds: u32,
) -> Result<Vec<RoundDocument>, StatsError> {
    let found = discover(dir, season)?;
    let mut rounds = Vec::new();

    for round in 1..=max_rounds {
        let Some(path) = found.get(&round) else {
            warn!(season, round, "Round file missing, skipping");
            continue;
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read round file, skipping");
                continue;
            }
        };
        match serde_json::from_str::<RoundDocument>(&text) {
            Ok(doc) => {
                debug!(season, round, games = doc.overview.total_games, "Loaded round");
                rounds.push(doc);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Invalid round file, skipping"),
        }
    }

    if rounds.is_empty() {
        return Err(StatsError::NoRounds {
            season,
            dir: dir.to_path_buf(),
        });
    }
    rounds.sort_by_key(|r| r.round_number);
    info!(season, rounds = rounds.len(), "Loaded season rounds");
    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_number_from_file_name() {
        assert_eq!(round_number("season-2-round-3.json", 2), Some(3));
        assert_eq!(round_number("season-2-round-12.json", 2), Some(12));
        assert_eq!(round_number("season-2-round-3-analysis.json", 2), None);
        assert_eq!(round_number("season-3-round-3.json", 2), None);
        assert_eq!(round_number("season-2-round-.json", 2), None);
    }

    #[test]
    fn test_empty_directory_is_no_rounds() {
        let dir = std::env::temp_dir().join(format!("league-stats-empty-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let err = load_rounds(&dir, 9, 7).unwrap_err();
        assert!(matches!(err, StatsError::NoRounds { season: 9, .. }));
        fs::remove_dir_all(&dir).unwrap();
    }
}
