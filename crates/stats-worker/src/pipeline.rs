//! Round and season jobs: read inputs from the data directory, fan games out
//! to a bounded pool, aggregate, and write the JSON documents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chess_core::{parse_game, split_games, GameParseFailure, ParseOutcome, ParsedGame};
use league_stats::season::loader::{load_rounds, round_path};
use league_stats::{
    build_season, AnalysisReport, GameAnalysis, Roster, RoundBuilder, RoundDocument,
    SeasonDocument, TacticalReport,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

use crate::analysis;
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::evaluator::Evaluator;
use crate::stockfish::StockfishEngine;

/// Shared engine handles; game `i` goes to engine `i % len`.
pub type EnginePool<E> = Vec<Arc<Mutex<E>>>;

#[derive(Debug, Clone)]
pub struct RoundJob {
    pub season: u32,
    pub round: u32,
    /// Overrides `season-S-round-R.pgn` in the data directory.
    pub pgn: Option<PathBuf>,
    /// Overrides the configured increment.
    pub increment: Option<u32>,
    /// Run the engine instead of reading a saved analysis report.
    pub analyze: bool,
}

pub fn pgn_path(data_dir: &Path, season: u32, round: u32) -> PathBuf {
    data_dir.join(format!("season-{season}-round-{round}.pgn"))
}

pub fn analysis_path(data_dir: &Path, season: u32, round: u32) -> PathBuf {
    data_dir.join(format!("season-{season}-round-{round}-analysis.json"))
}

pub fn tactics_path(data_dir: &Path, season: u32, round: u32) -> PathBuf {
    data_dir.join(format!("season-{season}-round-{round}-tactics.json"))
}

pub fn roster_path(data_dir: &Path, season: u32) -> PathBuf {
    data_dir.join(format!("season-{season}-teams.json"))
}

pub fn season_path(output_dir: &Path, season: u32) -> PathBuf {
    output_dir.join(format!("season-{season}-overview.json"))
}

async fn read_text(path: &Path) -> Result<String, WorkerError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| WorkerError::io(path, e))
}

/// A companion file, or `None` when it does not exist.
async fn read_companion(path: &Path) -> Result<Option<String>, WorkerError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            debug!(path = %path.display(), "Loaded companion file");
            Ok(Some(text))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(WorkerError::io(path, e)),
    }
}

async fn read_companion_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, WorkerError> {
    match read_companion(path).await? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

async fn write_json<T: Serialize>(path: &Path, doc: &T) -> Result<(), WorkerError> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| WorkerError::io(dir, e))?;
    }
    let text = serde_json::to_string_pretty(doc)?;
    tokio::fs::write(path, text)
        .await
        .map_err(|e| WorkerError::io(path, e))
}

fn pool_closed(_: tokio::sync::AcquireError) -> WorkerError {
    WorkerError::Analysis("worker pool closed".into())
}

/// Parse every game of a round on blocking tasks, at most `workers` at once.
/// Results come back in game order; failures are kept, never fatal.
pub async fn parse_round(text: &str, workers: usize) -> Result<ParseOutcome, WorkerError> {
    let chunks = split_games(text);
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(chunks.len());

    for (index, raw) in chunks.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await.map_err(pool_closed)?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            parse_game(index, &raw).map_err(|e| GameParseFailure::new(index, &raw, &e))
        }));
    }

    let mut outcome = ParseOutcome {
        total_games: handles.len(),
        ..Default::default()
    };
    for handle in handles {
        match handle.await? {
            Ok(game) => outcome.games.push(game),
            Err(failure) => {
                warn!(game_index = failure.game_index, reason = %failure.reason, "Failed to parse game");
                outcome.errors.push(failure);
            }
        }
    }
    Ok(outcome)
}

/// Engine analysis of every game with moves, one task per game.
pub async fn analyze_round<E>(
    engines: &EnginePool<E>,
    games: &[ParsedGame],
) -> Result<AnalysisReport, WorkerError>
where
    E: Evaluator + 'static,
{
    if engines.is_empty() {
        return Err(WorkerError::Config("no engines available for analysis"));
    }
    let semaphore = Arc::new(Semaphore::new(engines.len()));
    let mut handles = Vec::new();

    for (i, game) in games.iter().filter(|g| g.has_moves()).enumerate() {
        let permit = semaphore.clone().acquire_owned().await.map_err(pool_closed)?;
        let engine = engines[i % engines.len()].clone();
        let game = game.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permit;
            let mut engine = engine.lock().await;
            let result = analysis::analyze_game(&mut *engine, &game).await;
            match &result {
                Ok(_) => debug!(game_index = game.index, plies = game.ply_count(), "Game analysed"),
                Err(e) => warn!(game_index = game.index, error = %e, "Game analysis failed"),
            }
            result
        }));
    }

    let mut analysed: Vec<GameAnalysis> = Vec::with_capacity(handles.len());
    for handle in handles {
        analysed.push(handle.await??);
    }
    Ok(analysis::report(analysed))
}

pub async fn spawn_engines(config: &WorkerConfig) -> Result<EnginePool<StockfishEngine>, WorkerError> {
    let mut engines = Vec::with_capacity(config.workers);
    for engine_id in 0..config.workers {
        let engine = StockfishEngine::new(&config.stockfish_path, config.nodes_per_position).await?;
        debug!(engine_id, "Stockfish engine ready");
        engines.push(Arc::new(Mutex::new(engine)));
    }
    info!(count = engines.len(), nodes = config.nodes_per_position, "Engine pool ready");
    Ok(engines)
}

/// Build and write one round document. With `engines`, the games are
/// analysed here; otherwise a saved analysis report is merged if present.
/// Aggregation itself runs on this task, single-threaded, so the document
/// does not depend on scheduling.
pub async fn build_round<E>(
    config: &WorkerConfig,
    job: &RoundJob,
    engines: Option<&EnginePool<E>>,
) -> Result<RoundDocument, WorkerError>
where
    E: Evaluator + 'static,
{
    let data_dir = &config.data_dir;
    let pgn = job
        .pgn
        .clone()
        .unwrap_or_else(|| pgn_path(data_dir, job.season, job.round));

    let text = read_text(&pgn).await?;
    let outcome = parse_round(&text, config.workers).await?;
    info!(
        season = job.season,
        round = job.round,
        games = outcome.total_games,
        failed = outcome.errors.len(),
        "Round parsed"
    );

    let analysis = match engines {
        Some(engines) => Some(analyze_round(engines, &outcome.games).await?),
        None => read_companion_json(&analysis_path(data_dir, job.season, job.round)).await?,
    };
    let tactics: Option<TacticalReport> =
        read_companion_json(&tactics_path(data_dir, job.season, job.round)).await?;
    let roster = match read_companion(&roster_path(data_dir, job.season)).await? {
        Some(text) => Some(Roster::from_json(&text)?),
        None => None,
    };

    let doc = RoundBuilder::new(job.season, job.round)
        .increment(job.increment.unwrap_or(config.increment_secs))
        .analysis(analysis)
        .tactical_patterns(tactics)
        .roster(roster.as_ref())
        .build(&outcome);

    let path = round_path(&config.output_dir, job.season, job.round);
    write_json(&path, &doc).await?;
    info!(path = %path.display(), "Round document written");
    Ok(doc)
}

/// `build_round` with a Stockfish pool when the job asks for analysis.
pub async fn run_round(config: &WorkerConfig, job: &RoundJob) -> Result<RoundDocument, WorkerError> {
    if !job.analyze {
        return build_round::<StockfishEngine>(config, job, None).await;
    }

    let engines = spawn_engines(config).await?;
    let result = build_round(config, job, Some(&engines)).await;

    info!("Shutting down Stockfish engines");
    for engine in engines {
        engine.lock().await.quit().await;
    }
    result
}

/// Build and write the season document from the round documents on disk.
pub async fn run_season(config: &WorkerConfig, season: u32) -> Result<SeasonDocument, WorkerError> {
    let rounds = load_rounds(&config.output_dir, season, config.max_rounds)?;
    let doc = build_season(season, &rounds, chrono::Utc::now());
    let path = season_path(&config.output_dir, season);
    write_json(&path, &doc).await?;
    info!(path = %path.display(), rounds = doc.rounds_included.len(), "Season document written");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Score;

    const ROUND: &str = "[White \"Ann\"]\n[Black \"Bo\"]\n[Result \"0-1\"]\n\n\
                         1. f3 e5 2. g4 Qh4# 0-1\n\n\
                         [White \"Cy\"]\n[Black \"Di\"]\n[Result \"1-0\"]\n\n1-0\n";

    /// Scores every position as level.
    struct LevelEngine {
        calls: usize,
    }

    impl Evaluator for LevelEngine {
        async fn evaluate(&mut self, _fen: &str) -> Result<Score, WorkerError> {
            self.calls += 1;
            Ok(Score::cp(0))
        }
    }

    struct BrokenEngine;

    impl Evaluator for BrokenEngine {
        async fn evaluate(&mut self, _fen: &str) -> Result<Score, WorkerError> {
            Err(WorkerError::Engine("engine went away".into()))
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stats-worker-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config_in(dir: &Path) -> WorkerConfig {
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

    #[test]
    fn test_file_names() {
        let dir = Path::new("/data");
        assert_eq!(pgn_path(dir, 2, 3), PathBuf::from("/data/season-2-round-3.pgn"));
        assert_eq!(
            analysis_path(dir, 2, 3),
            PathBuf::from("/data/season-2-round-3-analysis.json")
        );
        assert_eq!(roster_path(dir, 2), PathBuf::from("/data/season-2-teams.json"));
        assert_eq!(season_path(dir, 2), PathBuf::from("/data/season-2-overview.json"));
    }

    #[tokio::test]
    async fn test_parse_round_keeps_order_and_failures() {
        let text = "[White \"A\"]\n[Black \"B\"]\n\n1. e4 e5 *\n\n\
                    [White \"C\"]\n[Black \"D\"]\n\n1. e4 Ke7?? 2. Ke3 *\n\n\
                    [White \"E\"]\n[Black \"F\"]\n\n1. d4 1-0\n";
        let outcome = parse_round(text, 2).await.unwrap();
        assert_eq!(outcome.total_games, 3);
        let indices: Vec<usize> = outcome.games.iter().map(|g| g.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].game_index, 1);
    }

    #[tokio::test]
    async fn test_analyze_round_skips_forfeits() {
        let outcome = parse_round(ROUND, 2).await.unwrap();
        let engines: EnginePool<LevelEngine> = (0..2)
            .map(|_| Arc::new(Mutex::new(LevelEngine { calls: 0 })))
            .collect();

        let report = analyze_round(&engines, &outcome.games).await.unwrap();
        assert_eq!(report.games.len(), 1);
        assert_eq!(report.games[0].game.game_index, 0);
        assert_eq!(report.games[0].white_acpl, 0.0);

        // 4 plies means 5 positions, all on the first engine
        assert_eq!(engines[0].lock().await.calls, 5);
        assert_eq!(engines[1].lock().await.calls, 0);
    }

    #[tokio::test]
    async fn test_analyze_round_surfaces_engine_failure() {
        let outcome = parse_round(ROUND, 1).await.unwrap();
        let engines: EnginePool<BrokenEngine> = vec![Arc::new(Mutex::new(BrokenEngine))];
        let err = analyze_round(&engines, &outcome.games).await.unwrap_err();
        assert!(matches!(err, WorkerError::Engine(_)));
    }

    #[tokio::test]
    async fn test_build_round_and_season() {
        let dir = scratch_dir("round");
        let config = config_in(&dir);
        std::fs::create_dir_all(&config.data_dir).unwrap();
        std::fs::write(pgn_path(&config.data_dir, 1, 1), ROUND).unwrap();
        std::fs::write(
            tactics_path(&config.data_dir, 1, 1),
            r#"{"checks": {"total": 9}}"#,
        )
        .unwrap();

        let engines: EnginePool<LevelEngine> = vec![Arc::new(Mutex::new(LevelEngine { calls: 0 }))];
        let doc = build_round(&config, &job(1), Some(&engines)).await.unwrap();
        assert_eq!(doc.overview.total_games, 2);
        assert_eq!(doc.overview.games_with_moves, 1);
        assert!(doc.analysis.is_some());
        assert!(doc.tactical_patterns.is_some());
        assert!(doc.teams.is_none());
        assert!(round_path(&config.output_dir, 1, 1).exists());

        let season = run_season(&config, 1).await.unwrap();
        assert_eq!(season.rounds_included, vec![1]);
        assert!(season_path(&config.output_dir, 1).exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_build_round_is_repeatable() {
        let dir = scratch_dir("repeat");
        let config = config_in(&dir);
        std::fs::create_dir_all(&config.data_dir).unwrap();
        std::fs::write(pgn_path(&config.data_dir, 1, 1), ROUND).unwrap();

        let first = build_round::<LevelEngine>(&config, &job(1), None).await.unwrap();
        let second = build_round::<LevelEngine>(&config, &job(1), None).await.unwrap();
        assert_eq!(first, second);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_round_file_is_an_io_error() {
        let dir = scratch_dir("missing");
        let config = config_in(&dir);
        let err = build_round::<LevelEngine>(&config, &job(4), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::Io { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
