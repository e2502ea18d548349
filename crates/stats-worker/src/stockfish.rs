//! Stockfish engine wrapper using UCI protocol (async I/O)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use tracing::debug;

use crate::error::WorkerError;
use crate::evaluator::{Evaluator, Score};

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    nodes: u32,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(path: &str, nodes: u32) -> Result<Self, WorkerError> {
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| WorkerError::Engine(format!("Failed to spawn Stockfish: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| WorkerError::Engine("Stockfish stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| WorkerError::Engine("Stockfish stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            nodes,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine.send("setoption name Threads value 1").await?;
        engine.send("setoption name Hash value 64").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    async fn send(&mut self, cmd: &str) -> Result<(), WorkerError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| WorkerError::Engine(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| WorkerError::Engine(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Next output line, trimmed. End of output means the process died.
    async fn read_line(&mut self) -> Result<String, WorkerError> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| WorkerError::Engine(format!("Failed to read from Stockfish: {e}")))?;
        if read == 0 {
            return Err(WorkerError::Engine("Stockfish exited unexpectedly".into()));
        }
        Ok(line.trim().to_string())
    }

    async fn wait_for(&mut self, expected: &str) -> Result<(), WorkerError> {
        loop {
            let line = self.read_line().await?;
            debug!(line = %line, "SF >");
            if line == expected {
                return Ok(());
            }
        }
    }

    /// Score a position, relative to the side to move, until `bestmove`.
    async fn search(&mut self, fen: &str) -> Result<(Option<i32>, Option<i32>), WorkerError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go nodes {}", self.nodes)).await?;

        let (mut cp, mut mate) = (None, None);
        loop {
            let line = self.read_line().await?;
            if line.starts_with("info") && line.contains(" score ") {
                // Mated positions report `score mate 0` with no pv.
                if let Some(c) = parse_cp(&line) {
                    cp = Some(c);
                    mate = None;
                }
                if let Some(m) = parse_mate(&line) {
                    mate = Some(m);
                    cp = None;
                }
            } else if line.starts_with("bestmove") {
                return Ok((cp, mate));
            }
        }
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Evaluator for StockfishEngine {
    async fn evaluate(&mut self, fen: &str) -> Result<Score, WorkerError> {
        let white_to_move = fen.split_whitespace().nth(1) != Some("b");
        let (cp, mate) = self.search(fen).await?;
        Ok(Score::from_engine(cp, mate, white_to_move))
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        let _ = self.process.start_kill();
    }
}

/// Value following `keyword` in a UCI info line.
fn field(line: &str, keyword: &str) -> Option<i32> {
    let mut parts = line.split_whitespace();
    parts.find(|p| *p == keyword)?;
    parts.next()?.parse().ok()
}

fn parse_cp(line: &str) -> Option<i32> {
    field(line, "cp")
}

fn parse_mate(line: &str) -> Option<i32> {
    field(line, "mate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cp() {
        let line = "info depth 20 seldepth 25 multipv 1 score cp 35 nodes 100000 pv e2e4";
        assert_eq!(parse_cp(line), Some(35));
        assert_eq!(parse_mate(line), None);
    }

    #[test]
    fn test_parse_mate() {
        assert_eq!(parse_mate("info depth 20 score mate -3 nodes 100000 pv e2e4"), Some(-3));
        assert_eq!(parse_mate("info depth 0 score mate 0"), Some(0));
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(parse_cp("info depth 1 score cp"), None);
    }
}
