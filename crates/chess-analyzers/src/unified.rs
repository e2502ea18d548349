//! Runs every detector over a round in a single replay and collects the
//! superlatives into one `FunStats` document.

use chess_core::ParsedGame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer_trait::{replay, GameAnalyzer, Superlative};
use crate::analyzers::capture_sequence::{CaptureSequenceAnalyzer, SequenceRecord};
use crate::analyzers::castling::{
    CastlingMoveRecord, CastlingRaceAnalyzer, CastlingRaceRecord, SlowestCastlingAnalyzer,
};
use crate::analyzers::center_stage::{CenterStageAnalyzer, CenterStageRecord};
use crate::analyzers::check_sequence::CheckSequenceAnalyzer;
use crate::analyzers::comfort_zone::{ComfortZoneAnalyzer, ComfortZoneRecord};
use crate::analyzers::crosshairs::{CrosshairsAnalyzer, CrosshairsRecord};
use crate::analyzers::enemy_territory::{EnemyTerritoryAnalyzer, HomebodyRecord, InvasionRecord};
use crate::analyzers::opening_hipster::{HipsterRecord, OpeningHipsterAnalyzer};
use crate::analyzers::pawn_storm::{PawnStormAnalyzer, PawnStormRecord};
use crate::analyzers::piece_loyalty::{LoyaltyRecord, PieceLoyaltyAnalyzer};
use crate::analyzers::queen_trade::{QueenTradeAnalyzer, QueenTradeRecord};
use crate::analyzers::rook_lift::{RookLiftAnalyzer, RookLiftRecord};
use crate::analyzers::side_counts::{
    self, CapturesRecord, DistanceRecord, MovesRecord, RetreatsRecord,
};
use crate::analyzers::square_tourist::{SquareTouristAnalyzer, TouristRecord};
use crate::analyzers::tension::{TensionAnalyzer, TensionRecord};
use crate::time::{
    analyze_round_time, CountRecord, PaceRecord, SadTimesRecord, ScrambleRecord, SniperRecord,
    ThinkRecord, TimeSummary,
};

/// Every round-wide superlative. Absent awards serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunStats {
    pub fastest_queen_trade: Option<QueenTradeRecord>,
    pub slowest_queen_trade: Option<QueenTradeRecord>,
    pub longest_capture_sequence: Option<SequenceRecord>,
    pub longest_check_sequence: Option<SequenceRecord>,
    pub pawn_storm: Option<PawnStormRecord>,
    pub piece_loyalty: Option<LoyaltyRecord>,
    pub square_tourist: Option<TouristRecord>,
    pub castling_race: Option<CastlingRaceRecord>,
    pub opening_hipster: Option<HipsterRecord>,
    pub dadbod_shuffler: Option<MovesRecord>,
    pub sporty_queen: Option<DistanceRecord>,
    pub edge_lord: Option<MovesRecord>,
    pub rook_lift: Option<RookLiftRecord>,
    pub center_stage: Option<CenterStageRecord>,
    pub dark_lord: Option<CapturesRecord>,
    pub chicken_award: Option<RetreatsRecord>,
    pub homebody: Option<HomebodyRecord>,
    pub late_bloomer: Option<InvasionRecord>,
    pub quick_draw: Option<InvasionRecord>,
    pub crosshairs: Option<CrosshairsRecord>,
    pub longest_tension: Option<TensionRecord>,
    pub slowest_castling: Option<CastlingMoveRecord>,
    pub pawn_captures: Option<CapturesRecord>,
    pub anti_orthogonal: Option<MovesRecord>,
    pub comfort_zone: Option<ComfortZoneRecord>,
    pub sunglasses: Option<CapturesRecord>,

    pub most_premoves: Option<CountRecord>,
    pub longest_think: Option<ThinkRecord>,
    pub zeitnot_addict: Option<CountRecord>,
    pub time_scramble_survivor: Option<ScrambleRecord>,
    pub bullet_speed: Option<PaceRecord>,
    pub sniper: Option<SniperRecord>,
    pub opening_blitzer: Option<PaceRecord>,
    pub sad_times: Option<SadTimesRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_summary: Option<TimeSummary>,
}

/// Replay the round once with all detectors, then run the clock analysis.
/// Forfeits are skipped by the replay itself.
pub fn compute_fun_stats(games: &[&ParsedGame], increment: u32) -> FunStats {
    let mut queen_trade = QueenTradeAnalyzer::new();
    let mut captures = CaptureSequenceAnalyzer::new();
    let mut checks = CheckSequenceAnalyzer::new();
    let mut pawn_storm = PawnStormAnalyzer::new();
    let mut loyalty = PieceLoyaltyAnalyzer::new();
    let mut tourist = SquareTouristAnalyzer::new();
    let mut castling_race = CastlingRaceAnalyzer::new();
    let mut slowest_castling = SlowestCastlingAnalyzer::new();
    let mut hipster = OpeningHipsterAnalyzer::new();
    let mut dadbod = side_counts::dadbod_shuffler();
    let mut sporty = side_counts::sporty_queen();
    let mut edge = side_counts::edge_lord();
    let mut rook_lift = RookLiftAnalyzer::new();
    let mut center = CenterStageAnalyzer::new();
    let mut dark = side_counts::dark_lord();
    let mut light = side_counts::sunglasses();
    let mut chicken = side_counts::chicken_award();
    let mut territory = EnemyTerritoryAnalyzer::new();
    let mut crosshairs = CrosshairsAnalyzer::new();
    let mut tension = TensionAnalyzer::new();
    let mut pawn_captures = side_counts::pawn_captures();
    let mut diagonal = side_counts::anti_orthogonal();
    let mut comfort = ComfortZoneAnalyzer::new();

    {
        let mut all: [&mut dyn GameAnalyzer; 23] = [
            &mut queen_trade,
            &mut captures,
            &mut checks,
            &mut pawn_storm,
            &mut loyalty,
            &mut tourist,
            &mut castling_race,
            &mut slowest_castling,
            &mut hipster,
            &mut dadbod,
            &mut sporty,
            &mut edge,
            &mut rook_lift,
            &mut center,
            &mut dark,
            &mut light,
            &mut chicken,
            &mut territory,
            &mut crosshairs,
            &mut tension,
            &mut pawn_captures,
            &mut diagonal,
            &mut comfort,
        ];
        debug!(analyzers = all.len(), games = games.len(), "replaying round");
        replay(games, &mut all);
    }

    let trades = queen_trade.into_record().unwrap_or_default();
    let territory = territory.into_record().unwrap_or_default();
    let time = analyze_round_time(games, increment);

    FunStats {
        fastest_queen_trade: trades.fastest,
        slowest_queen_trade: trades.slowest,
        longest_capture_sequence: captures.into_record(),
        longest_check_sequence: checks.into_record(),
        pawn_storm: pawn_storm.into_record(),
        piece_loyalty: loyalty.into_record(),
        square_tourist: tourist.into_record(),
        castling_race: castling_race.into_record(),
        opening_hipster: hipster.into_record(),
        dadbod_shuffler: dadbod.into_record(),
        sporty_queen: sporty.into_record(),
        edge_lord: edge.into_record(),
        rook_lift: rook_lift.into_record(),
        center_stage: center.into_record(),
        dark_lord: dark.into_record(),
        chicken_award: chicken.into_record(),
        homebody: territory.homebody,
        late_bloomer: territory.late_bloomer,
        quick_draw: territory.quick_draw,
        crosshairs: crosshairs.into_record(),
        longest_tension: tension.into_record(),
        slowest_castling: slowest_castling.into_record(),
        pawn_captures: pawn_captures.into_record(),
        anti_orthogonal: diagonal.into_record(),
        comfort_zone: comfort.into_record(),
        sunglasses: light.into_record(),

        most_premoves: time.most_premoves,
        longest_think: time.longest_think,
        zeitnot_addict: time.zeitnot_addict,
        time_scramble_survivor: time.time_scramble_survivor,
        bullet_speed: time.bullet_speed,
        sniper: time.sniper,
        opening_blitzer: time.opening_blitzer,
        sad_times: time.sad_times,
        time_summary: time.summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_forfeits_yield_all_null() {
        let forfeit =
            parse_game(0, "[White \"A\"]\n[Black \"B\"]\n[Result \"1-0\"]\n\n1-0").unwrap();
        let stats = compute_fun_stats(&[&forfeit], 0);
        assert_eq!(stats, FunStats::default());

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["fastestQueenTrade"].is_null());
        assert!(json["sadTimes"].is_null());
        assert!(json.get("timeSummary").is_none());
    }

    #[test]
    fn test_single_replay_fills_board_awards() {
        let game = parse_game(
            0,
            "[White \"Ann\"]\n[Black \"Bo\"]\n\n1. d4 e5 2. dxe5 d6 3. exd6 Nf6 4. dxc7 Nc6 \
             5. Nf3 Be7 6. Qxd8+ Bxd8 *",
        )
        .unwrap();
        let stats = compute_fun_stats(&[&game], 0);
        let trade = stats.fastest_queen_trade.unwrap();
        assert_eq!(trade.moves, 6);
        assert_eq!(trade.game.white, "Ann");
        assert_eq!(stats.pawn_captures.unwrap().captures, 3);
        assert!(stats.sporty_queen.is_some());
        assert!(stats.longest_think.is_none());
    }

    #[test]
    fn test_round_trips_through_json() {
        let game = parse_game(0, "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 O-O *").unwrap();
        let stats = compute_fun_stats(&[&game], 0);
        let json = serde_json::to_string(&stats).unwrap();
        let back: FunStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
