//! Worker configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::error::WorkerError;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Directory holding round PGN files and companion reports
    pub data_dir: PathBuf,

    /// Directory the round and season documents are written to
    pub output_dir: PathBuf,

    /// Default clock increment in seconds
    pub increment_secs: u32,

    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Nodes per position for Stockfish analysis
    pub nodes_per_position: u32,

    /// Games parsed or analysed at once
    pub workers: usize,

    /// Highest round number a season is searched for
    pub max_rounds: u32,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, WorkerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WorkerError> {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let data_dir = PathBuf::from(lookup("STATS_DATA_DIR").unwrap_or_else(|| "data".to_string()));
        let output_dir =
            PathBuf::from(lookup("STATS_OUTPUT_DIR").unwrap_or_else(|| "public/stats".to_string()));

        let stockfish_path =
            lookup("STOCKFISH_PATH").unwrap_or_else(|| "/usr/local/bin/stockfish".to_string());

        let increment_secs = parsed("STATS_INCREMENT_SECS").unwrap_or(45) as u32;
        let nodes_per_position = parsed("NODES_PER_POSITION").unwrap_or(100_000) as u32;
        let workers = parsed("STATS_WORKERS")
            .map(|n| n as usize)
            .unwrap_or_else(num_cpus::get);
        let max_rounds = parsed("STATS_MAX_ROUNDS").unwrap_or(7) as u32;

        if workers == 0 {
            return Err(WorkerError::Config("STATS_WORKERS must be at least 1"));
        }
        if nodes_per_position == 0 {
            return Err(WorkerError::Config("NODES_PER_POSITION must be at least 1"));
        }
        if max_rounds == 0 {
            return Err(WorkerError::Config("STATS_MAX_ROUNDS must be at least 1"));
        }

        Ok(Self {
            data_dir,
            output_dir,
            increment_secs,
            stockfish_path,
            nodes_per_position,
            workers,
            max_rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("public/stats"));
        assert_eq!(config.increment_secs, 45);
        assert_eq!(config.nodes_per_position, 100_000);
        assert_eq!(config.max_rounds, 7);
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("STATS_DATA_DIR", "/srv/league"),
            ("STATS_INCREMENT_SECS", "10"),
            ("STATS_WORKERS", "3"),
            ("NODES_PER_POSITION", "lots"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/league"));
        assert_eq!(config.increment_secs, 10);
        assert_eq!(config.workers, 3);
        assert_eq!(config.nodes_per_position, 100_000);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = WorkerConfig::from_lookup(lookup(&[("STATS_WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, WorkerError::Config(_)));
    }
}
