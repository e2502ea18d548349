//! Integration tests: the worker's round and season jobs on disk.

mod common;

use common::*;
use league_stats::AnalysisReport;
use stats_worker::pipeline::{analysis_path, pgn_path, roster_path, season_path};
use stats_worker::{run_round, run_season, RoundJob, WorkerConfig};

fn config(name: &str) -> WorkerConfig {
    let dir = scratch_dir(name);
    WorkerConfig {
        data_dir: dir.join("data"),
        output_dir: dir.join("out"),
        increment_secs: 45,
        stockfish_path: "stockfish".into(),
        nodes_per_position: 1,
        workers: 2,
        max_rounds: 7,
    }
}

fn job(round: u32) -> RoundJob {
    RoundJob {
        season: 1,
        round,
        pgn: None,
        increment: None,
        analyze: false,
    }
}

#[tokio::test]
async fn test_round_merges_companion_files() {
    let config = config("worker-companions");
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(
        pgn_path(&config.data_dir, 1, 1),
        round_text(&[QUEEN_TRADE_GAME, FORFEIT_GAME, FOOLS_MATE]),
    )
    .unwrap();
    std::fs::write(
        analysis_path(&config.data_dir, 1, 1),
        serde_json::to_string(&AnalysisReport::default()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        roster_path(&config.data_dir, 1),
        r#"{"Rooks": ["Ann Lee", "Cy Moss"], "Knights": {"players": ["Bo K.", "Di Park"]}}"#,
    )
    .unwrap();

    let doc = run_round(&config, &job(1)).await.unwrap();
    assert_eq!(doc.overview.total_games, 3);
    assert!(doc.analysis.is_some());
    assert!(doc.tactical_patterns.is_none());
    let teams = doc.teams.as_ref().unwrap();
    assert_eq!(teams.stats.len(), 2);

    let _ = std::fs::remove_dir_all(config.data_dir.parent().unwrap());
}

#[tokio::test]
async fn test_season_from_worker_rounds() {
    let config = config("worker-season");
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(pgn_path(&config.data_dir, 1, 1), QUEEN_TRADE_GAME).unwrap();
    let custom = config.data_dir.join("late-upload.pgn");
    std::fs::write(&custom, FOOLS_MATE).unwrap();

    run_round(&config, &job(1)).await.unwrap();
    let mut second = job(2);
    second.pgn = Some(custom);
    second.increment = Some(0);
    run_round(&config, &second).await.unwrap();

    let season = run_season(&config, 1).await.unwrap();
    assert_eq!(season.rounds_included, vec![1, 2]);
    assert_eq!(season.player_stats["Di Park"].games_played, 1);

    let written = std::fs::read_to_string(season_path(&config.output_dir, 1)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["roundsIncluded"], serde_json::json!([1, 2]));

    let _ = std::fs::remove_dir_all(config.data_dir.parent().unwrap());
}
