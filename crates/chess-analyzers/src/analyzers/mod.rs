//! One analyzer per superlative. Every analyzer folds over games in index
//! order and only replaces its record on a strictly better value.

pub mod capture_sequence;
pub mod castling;
pub mod center_stage;
pub mod check_sequence;
pub mod comfort_zone;
pub mod crosshairs;
pub mod enemy_territory;
pub mod opening_hipster;
pub mod pawn_storm;
pub mod piece_loyalty;
pub mod queen_trade;
pub mod rook_lift;
pub mod side_counts;
pub mod square_tourist;
pub mod tension;

#[cfg(test)]
mod tests {
    use chess_core::{parse_game, ParsedGame, Side};

    use super::*;
    use crate::analyzer_trait::run_analyzer;

    const QUEEN_TRADE: &str =
        "1. d4 e5 2. dxe5 d6 3. exd6 Nf6 4. dxc7 Nc6 5. Nf3 Be7 6. Qxd8+ Bxd8 *";
    const CASTLES: &str = "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 O-O *";

    fn game(index: usize, pgn: &str) -> ParsedGame {
        parse_game(index, pgn).unwrap()
    }

    #[test]
    fn test_queen_trade_dated_by_second_capture() {
        let g = game(0, QUEEN_TRADE);
        let trades = run_analyzer(&[&g], queen_trade::QueenTradeAnalyzer::new()).unwrap();
        assert_eq!(trades.fastest.as_ref().unwrap().moves, 6);
        assert_eq!(trades.slowest.unwrap().moves, 6);
    }

    #[test]
    fn test_no_queen_trade_is_none() {
        let g = game(0, CASTLES);
        let trades = run_analyzer(&[&g], queen_trade::QueenTradeAnalyzer::new()).unwrap();
        assert!(trades.fastest.is_none());
        assert!(trades.slowest.is_none());
    }

    #[test]
    fn test_capture_sequence() {
        let g = game(0, QUEEN_TRADE);
        let record =
            run_analyzer(&[&g], capture_sequence::CaptureSequenceAnalyzer::new()).unwrap();
        assert_eq!(record.length, 2);
        assert_eq!(record.start_move, 6);
    }

    #[test]
    fn test_single_check_is_not_a_sequence() {
        let g = game(0, QUEEN_TRADE);
        assert!(run_analyzer(&[&g], check_sequence::CheckSequenceAnalyzer::new()).is_none());
    }

    #[test]
    fn test_check_sequence_ignores_quiet_replies() {
        let g = game(0, "1. e4 f5 2. Qh5+ g6 3. Qxg6+ hxg6 *");
        let record = run_analyzer(&[&g], check_sequence::CheckSequenceAnalyzer::new()).unwrap();
        assert_eq!(record.length, 2);
        assert_eq!(record.start_move, 2);

        let g = game(
            0,
            "1. e4 e5 2. Bc4 Nc6 3. Bxf7+ Kxf7 4. Qf3+ Kg6 5. Qf5+ Kh6 *",
        );
        let record = run_analyzer(&[&g], check_sequence::CheckSequenceAnalyzer::new()).unwrap();
        assert_eq!(record.length, 3);
        assert_eq!(record.start_move, 3);
    }

    #[test]
    fn test_queen_distance_tie_goes_to_lower_index() {
        let pgn = "1. e4 e5 2. Qh5 Nc6 3. Qf3 Nf6 *";
        let (first, second) = (game(0, pgn), game(1, pgn));
        let record = run_analyzer(&[&first, &second], side_counts::sporty_queen()).unwrap();
        assert_eq!(record.game.game_index, 0);
        assert_eq!(record.distance, 8 + 4);
        assert_eq!(record.color, Side::White);
    }

    #[test]
    fn test_castling_detectors() {
        let g = game(0, CASTLES);
        let race = run_analyzer(&[&g], castling::CastlingRaceAnalyzer::new()).unwrap();
        assert_eq!(race.moves, 4);
        assert_eq!(race.winner, Side::White);

        let slowest = run_analyzer(&[&g], castling::SlowestCastlingAnalyzer::new()).unwrap();
        assert_eq!(slowest.moves, 5);
        assert_eq!(slowest.color, Side::Black);

        let shuffler = run_analyzer(&[&g], side_counts::dadbod_shuffler()).unwrap();
        assert_eq!(shuffler.moves, 1);
    }

    #[test]
    fn test_rook_lift_names_the_rook() {
        let g = game(0, "1. a4 e5 2. Ra3 d5 *");
        let record = run_analyzer(&[&g], rook_lift::RookLiftAnalyzer::new()).unwrap();
        assert_eq!(record.move_number, 2);
        assert_eq!(record.rook, "White's a1 Rook");
        assert_eq!(record.square, "a1");
    }

    #[test]
    fn test_retreats_skip_castling() {
        let g = game(0, "1. Nf3 Nf6 2. Ng1 Ng8 3. Nf3 Nc6 4. Ng1 *");
        let record = run_analyzer(&[&g], side_counts::chicken_award()).unwrap();
        assert_eq!(record.retreats, 2);
        assert_eq!(record.color, Side::White);
    }

    #[test]
    fn test_pawn_storm_counts_opening_pawn_moves() {
        let g = game(0, CASTLES);
        let record = run_analyzer(&[&g], pawn_storm::PawnStormAnalyzer::new()).unwrap();
        // e4, e5 and d3 fall before the opening ends at the second castle.
        assert_eq!(record.count, 3);
    }

    #[test]
    fn test_comfort_zone_share() {
        let g = game(0, "1. Nf3 e5 2. Ng1 e4 3. Nc3 d5 4. e3 *");
        let record = run_analyzer(&[&g], comfort_zone::ComfortZoneAnalyzer::new()).unwrap();
        assert_eq!(record.percentage, 100);
        assert_eq!(record.piece_type, "knights");
        assert_eq!(record.moves, 3);
    }

    #[test]
    fn test_piece_loyalty_needs_long_wait() {
        let g = game(0, CASTLES);
        assert!(run_analyzer(&[&g], piece_loyalty::PieceLoyaltyAnalyzer::new()).is_none());
    }

    #[test]
    fn test_piece_loyalty_counts_the_move_it_left_on() {
        let mut pgn = String::new();
        for n in 1..=15 {
            if n % 2 == 1 {
                pgn.push_str(&format!("{n}. Nf3 Nf6 "));
            } else {
                pgn.push_str(&format!("{n}. Ng1 Ng8 "));
            }
        }
        pgn.push_str("16. Nc3 Nc6 *");
        let g = game(0, &pgn);
        let record = run_analyzer(&[&g], piece_loyalty::PieceLoyaltyAnalyzer::new()).unwrap();
        assert_eq!(record.moves, 16);
        assert_eq!(record.piece, "Knight");
        assert_eq!(record.square, "b8");
    }

    #[test]
    fn test_center_stage_follows_one_piece() {
        let g = game(0, "1. Nc3 a6 2. Ne4 a5 3. Nc5 a4 4. Nd3 h6 5. Ne5 *");
        let record = run_analyzer(&[&g], center_stage::CenterStageAnalyzer::new()).unwrap();
        assert_eq!(record.moves, 2);
        assert_eq!(record.piece, "White's b1 Knight");
    }

    #[test]
    fn test_opening_hipster_needs_six_plies() {
        let short = game(0, "1. e4 c5 2. c3 *");
        assert!(run_analyzer(&[&short], opening_hipster::OpeningHipsterAnalyzer::new()).is_none());

        let g = game(0, "1. e4 c5 2. c3 Nf6 3. e5 Nd5 *");
        let record =
            run_analyzer(&[&g], opening_hipster::OpeningHipsterAnalyzer::new()).unwrap();
        assert_eq!(record.eco, "B22");
        assert_eq!(record.moves, "e4 c5 c3 Nf6 e5 Nd5");
    }

    #[test]
    fn test_enemy_territory() {
        let g = game(0, "1. e4 e5 2. Nf3 Nc6 3. Ng5 *");
        let awards =
            run_analyzer(&[&g], enemy_territory::EnemyTerritoryAnalyzer::new()).unwrap();
        let quick = awards.quick_draw.unwrap();
        assert_eq!(quick.player, Side::White);
        assert_eq!(quick.move_number, 3);
        let homebody = awards.homebody.unwrap();
        assert_eq!(homebody.pieces_in_enemy, 0);
        assert_eq!(homebody.player, Side::Black);
    }

    #[test]
    fn test_tension_closes_when_pieces_part() {
        let g = game(0, "1. e4 d5 2. Nc3 Nf6 3. exd5 *");
        let record = run_analyzer(&[&g], tension::TensionAnalyzer::new()).unwrap();
        assert_eq!(record.squares, "e4-d5");
        assert_eq!(record.moves, 3);
        assert_eq!(record.start_move, 1);
        assert_eq!(record.end_move, 3);
    }
}
