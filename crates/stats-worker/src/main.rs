//! League statistics worker
//!
//! `stats-worker round --season 3 --round 2 [--pgn FILE] [--increment 45] [--analyze]`
//! `stats-worker season --season 3`

use anyhow::{bail, Context};
use tracing::info;

use stats_worker::{run_round, run_season, RoundJob, WorkerConfig};

enum Command {
    Round(RoundJob),
    Season(u32),
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn number(args: &[String], flag: &str) -> anyhow::Result<Option<u32>> {
    flag_value(args, flag)
        .map(|v| v.parse().with_context(|| format!("{flag} expects a number, got {v:?}")))
        .transpose()
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let season = number(args, "--season")?.context("--season is required")?;
    match args.first().map(String::as_str) {
        Some("round") => Ok(Command::Round(RoundJob {
            season,
            round: number(args, "--round")?.context("--round is required")?,
            pgn: flag_value(args, "--pgn").map(Into::into),
            increment: number(args, "--increment")?,
            analyze: args.iter().any(|a| a == "--analyze"),
        })),
        Some("season") => Ok(Command::Season(season)),
        other => bail!("unknown command {other:?}, expected `round` or `season`"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    let config = WorkerConfig::load().context("Failed to load configuration")?;
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        workers = config.workers,
        "Configuration loaded"
    );

    match command {
        Command::Round(job) => {
            let doc = run_round(&config, &job)
                .await
                .with_context(|| format!("Failed to build season {} round {}", job.season, job.round))?;
            info!(
                games = doc.overview.total_games,
                parse_errors = doc.parse_errors.len(),
                analysed = doc.analysis.is_some(),
                "Round complete"
            );
        }
        Command::Season(season) => {
            let doc = run_season(&config, season)
                .await
                .with_context(|| format!("Failed to build season {season}"))?;
            info!(rounds = ?doc.rounds_included, players = doc.player_stats.len(), "Season complete");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_round_command() {
        let Command::Round(job) =
            parse_args(&args("round --season 3 --round 2 --increment 10 --analyze")).unwrap()
        else {
            panic!("expected a round command");
        };
        assert_eq!((job.season, job.round), (3, 2));
        assert_eq!(job.increment, Some(10));
        assert!(job.analyze);
        assert!(job.pgn.is_none());
    }

    #[test]
    fn test_season_command_and_errors() {
        assert!(matches!(parse_args(&args("season --season 4")), Ok(Command::Season(4))));
        assert!(parse_args(&args("round --season 4")).is_err());
        assert!(parse_args(&args("season --season four")).is_err());
        assert!(parse_args(&args("replay --season 1")).is_err());
    }
}
