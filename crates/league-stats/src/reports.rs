//! Companion reports merged into a round document: the engine analysis of
//! every game and an externally produced tactical-pattern report.

use std::collections::BTreeMap;

use chess_analyzers::GameRef;
use chess_core::Side;
use serde::{Deserialize, Serialize};

/// Move counts per quality bucket for one side of one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveQuality {
    pub blunders: u32,
    pub mistakes: u32,
    pub inaccuracies: u32,
    pub good: u32,
    pub excellent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlunderRecord {
    pub move_number: usize,
    pub color: Side,
    pub cp_loss: i32,
    pub win_loss: f64,
    pub severity: f64,
    #[serde(rename = "move")]
    pub san: String,
    /// Centipawns from White's side, mates saturated.
    pub eval_before: i32,
    pub eval_after: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComebackRecord {
    pub color: Side,
    pub swing: i32,
    /// "-340" or "M3"
    pub eval_from: String,
    pub eval_to: String,
    pub eval_from_cp: i32,
    pub eval_to_cp: i32,
    pub move_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscapeRecord {
    pub color: Side,
    pub escape_amount: i32,
    pub eval_before: i32,
    pub eval_after: i32,
    pub move_number: usize,
}

/// Engine verdict on one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysis {
    #[serde(flatten)]
    pub game: GameRef,
    #[serde(rename = "whiteACPL")]
    pub white_acpl: f64,
    #[serde(rename = "blackACPL")]
    pub black_acpl: f64,
    pub white_accuracy: f64,
    pub black_accuracy: f64,
    pub white_move_quality: MoveQuality,
    pub black_move_quality: MoveQuality,
    pub biggest_blunder: Option<BlunderRecord>,
    pub biggest_comeback: Option<ComebackRecord>,
    pub lucky_escape: Option<EscapeRecord>,
}

impl GameAnalysis {
    pub fn acpl(&self, side: Side) -> f64 {
        match side {
            Side::White => self.white_acpl,
            Side::Black => self.black_acpl,
        }
    }

    pub fn accuracy(&self, side: Side) -> f64 {
        match side {
            Side::White => self.white_accuracy,
            Side::Black => self.black_accuracy,
        }
    }

    pub fn move_quality(&self, side: Side) -> &MoveQuality {
        match side {
            Side::White => &self.white_move_quality,
            Side::Black => &self.black_move_quality,
        }
    }

    pub fn combined_acpl(&self) -> f64 {
        self.white_acpl + self.black_acpl
    }
}

/// One player's numbers in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub player: String,
    pub color: Side,
    pub accuracy: f64,
    pub acpl: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAcplRecord {
    #[serde(rename = "combinedACPL")]
    pub combined_acpl: f64,
    #[serde(rename = "whiteACPL")]
    pub white_acpl: f64,
    #[serde(rename = "blackACPL")]
    pub black_acpl: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBlunder {
    pub player: String,
    #[serde(flatten)]
    pub blunder: BlunderRecord,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryComeback {
    pub player: String,
    #[serde(flatten)]
    pub comeback: ComebackRecord,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEscape {
    pub player: String,
    #[serde(flatten)]
    pub escape: EscapeRecord,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Round-wide engine superlatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSummary {
    pub accuracy_king: Option<PerformanceRecord>,
    pub biggest_blunder: Option<SummaryBlunder>,
    pub comeback_king: Option<SummaryComeback>,
    pub lucky_escape: Option<SummaryEscape>,
    #[serde(rename = "lowestACPL")]
    pub lowest_acpl: Option<PerformanceRecord>,
    #[serde(rename = "highestACPL")]
    pub highest_acpl: Option<PerformanceRecord>,
    #[serde(rename = "lowestCombinedACPL")]
    pub lowest_combined_acpl: Option<CombinedAcplRecord>,
    #[serde(rename = "highestCombinedACPL")]
    pub highest_combined_acpl: Option<CombinedAcplRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub games: Vec<GameAnalysis>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    pub fn total_blunders(&self) -> u32 {
        self.games
            .iter()
            .map(|g| g.white_move_quality.blunders + g.black_move_quality.blunders)
            .sum()
    }

    pub fn total_mistakes(&self) -> u32 {
        self.games
            .iter()
            .map(|g| g.white_move_quality.mistakes + g.black_move_quality.mistakes)
            .sum()
    }

    /// Mean of both sides' ACPL over every analysed game.
    pub fn average_acpl(&self) -> Option<f64> {
        mean(self.games.iter().flat_map(|g| [g.white_acpl, g.black_acpl]))
    }

    pub fn average_accuracy(&self) -> Option<f64> {
        mean(
            self.games
                .iter()
                .flat_map(|g| [g.white_accuracy, g.black_accuracy]),
        )
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Tactical-pattern report produced by an external tool. Kept verbatim;
/// only the check tally is read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TacticalReport(pub BTreeMap<String, serde_json::Value>);

impl TacticalReport {
    /// `total` of a pattern entry such as `{"checks": {"total": 41}}`.
    pub fn total(&self, pattern: &str) -> Option<u64> {
        self.0.get(pattern)?.get("total")?.as_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(white_acpl: f64, black_acpl: f64, blunders: u32) -> GameAnalysis {
        GameAnalysis {
            game: GameRef {
                game_index: 0,
                game_id: None,
                white: "A".into(),
                black: "B".into(),
            },
            white_acpl,
            black_acpl,
            white_accuracy: 90.0,
            black_accuracy: 80.0,
            white_move_quality: MoveQuality {
                blunders,
                mistakes: 1,
                ..Default::default()
            },
            black_move_quality: MoveQuality::default(),
            biggest_blunder: None,
            biggest_comeback: None,
            lucky_escape: None,
        }
    }

    #[test]
    fn test_acpl_field_names() {
        let value = serde_json::to_value(game(12.5, 30.0, 0)).unwrap();
        assert_eq!(value["whiteACPL"], json!(12.5));
        assert_eq!(value["blackACPL"], json!(30.0));
        assert_eq!(value["white"], json!("A"));
        assert_eq!(value["whiteMoveQuality"]["blunders"], json!(0));
    }

    #[test]
    fn test_report_totals() {
        let report = AnalysisReport {
            games: vec![game(10.0, 20.0, 2), game(30.0, 40.0, 1)],
            summary: AnalysisSummary::default(),
        };
        assert_eq!(report.total_blunders(), 3);
        assert_eq!(report.total_mistakes(), 2);
        assert_eq!(report.average_acpl(), Some(25.0));
        assert_eq!(report.average_accuracy(), Some(85.0));
        assert_eq!(AnalysisReport::default().average_acpl(), None);
    }

    #[test]
    fn test_tactical_report_passthrough() {
        let raw = json!({"checks": {"total": 41}, "forks": {"total": 3, "games": []}});
        let report: TacticalReport = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(report.total("checks"), Some(41));
        assert_eq!(report.total("pins"), None);
        assert_eq!(serde_json::to_value(&report).unwrap(), raw);
    }
}
