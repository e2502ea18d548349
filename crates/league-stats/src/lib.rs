//! Round and season statistics for a chess league.
//!
//! [`round`] folds one round's parsed games into a [`RoundDocument`];
//! [`season`] reads the saved round documents back and builds the
//! season-wide [`SeasonDocument`]. Engine and tactical reports produced
//! elsewhere are described in [`reports`] and merged in when present.

pub mod error;
pub mod reports;
pub mod round;
pub mod season;

pub use error::StatsError;
pub use reports::{AnalysisReport, AnalysisSummary, GameAnalysis, MoveQuality, TacticalReport};
pub use round::teams::Roster;
pub use round::{RoundBuilder, RoundDocument};
pub use season::{build_season, SeasonDocument};

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(20.04), 20.0);
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(-1.26), -1.3);
    }

    #[test]
    fn test_percent_of_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
