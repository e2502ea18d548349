//! Every per-round award, its display name, who won it and a one-line
//! description of the winning feat.

use chess_analyzers::{FunStats, GameRef};
use chess_core::Side;

use crate::reports::AnalysisSummary;
use crate::round::awards::RoundAwards;

/// `FunStats` award keys with their display names, in document order.
pub const FUN_AWARDS: [(&str, &str); 34] = [
    ("fastestQueenTrade", "Fastest Queen Trade"),
    ("slowestQueenTrade", "Slowest Queen Trade"),
    ("longestCaptureSequence", "Longest Capture Spree"),
    ("longestCheckSequence", "Longest King Hunt"),
    ("pawnStorm", "Pawn Storm"),
    ("pieceLoyalty", "Piece Loyalty"),
    ("squareTourist", "Square Tourist"),
    ("castlingRace", "Castling Race Winner"),
    ("openingHipster", "Opening Hipster"),
    ("dadbodShuffler", "Dadbod Shuffler"),
    ("sportyQueen", "Sporty Queen"),
    ("edgeLord", "Professional Edger"),
    ("rookLift", "Rook Lift"),
    ("centerStage", "Center Stage"),
    ("darkLord", "Dark Mode Enthusiast"),
    ("chickenAward", "Chicken Award"),
    ("homebody", "Homeboy"),
    ("lateBloomer", "Late Bloomer"),
    ("quickDraw", "Fastest Gun"),
    ("crosshairs", "Crosshairs"),
    ("longestTension", "Hypertension Award"),
    ("slowestCastling", "Slowest Castling"),
    ("pawnCaptures", "Pawn Muncher"),
    ("antiOrthogonal", "Anti-Orthogonal"),
    ("comfortZone", "Comfort Zone"),
    ("sunglasses", "Sunglasses Required"),
    ("mostPremoves", "Premove Maniac"),
    ("longestThink", "Longest Think"),
    ("zeitnotAddict", "Zeitnot Addict"),
    ("timeScrambleSurvivor", "Time Scramble Survivor"),
    ("bulletSpeed", "Bullet Speed"),
    ("sniper", "Sniper"),
    ("openingBlitzer", "Opening Blitzer"),
    ("sadTimes", "Sad Times"),
];

/// Display name of any award key, falling back to the key itself.
pub fn display_name(key: &str) -> &str {
    FUN_AWARDS
        .iter()
        .chain(OTHER_AWARDS.iter())
        .find(|(k, _)| *k == key)
        .map_or(key, |&(_, name)| name)
}

const OTHER_AWARDS: [(&str, &str); 7] = [
    ("bloodbath", "Bloodbath"),
    ("pacifist", "Pacifist"),
    ("speedDemon", "Speed Demon"),
    ("endgameWizard", "Endgame Wizard"),
    ("openingSprinter", "Opening Sprinter"),
    ("accuracyKing", "GM Energy"),
    ("biggestBlunder", "Blunder of the Round"),
];

/// One award won in one round, by one player or both players of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardWin {
    pub key: &'static str,
    pub winners: Vec<String>,
    pub details: String,
}

fn both(game: &GameRef) -> Vec<String> {
    vec![game.white.clone(), game.black.clone()]
}

fn one(game: &GameRef, side: Side) -> Vec<String> {
    vec![game.player(side).to_string()]
}

fn named(player: &str) -> Vec<String> {
    vec![player.to_string()]
}

#[derive(Default)]
struct Wins(Vec<AwardWin>);

impl Wins {
    fn add(&mut self, key: &'static str, winners: Vec<String>, details: String) {
        self.0.push(AwardWin {
            key,
            winners,
            details,
        });
    }
}

/// Awards present in a round's fun stats, in [`FUN_AWARDS`] order.
pub fn fun_award_wins(stats: &FunStats) -> Vec<AwardWin> {
    let FunStats {
        fastest_queen_trade,
        slowest_queen_trade,
        longest_capture_sequence,
        longest_check_sequence,
        pawn_storm,
        piece_loyalty,
        square_tourist,
        castling_race,
        opening_hipster,
        dadbod_shuffler,
        sporty_queen,
        edge_lord,
        rook_lift,
        center_stage,
        dark_lord,
        chicken_award,
        homebody,
        late_bloomer,
        quick_draw,
        crosshairs,
        longest_tension,
        slowest_castling,
        pawn_captures,
        anti_orthogonal,
        comfort_zone,
        sunglasses,
        most_premoves,
        longest_think,
        zeitnot_addict,
        time_scramble_survivor,
        bullet_speed,
        sniper,
        opening_blitzer,
        sad_times,
        time_summary: _,
    } = stats;

    let mut w = Wins::default();
    if let Some(r) = fastest_queen_trade {
        w.add("fastestQueenTrade", both(&r.game), format!("move {}", r.moves));
    }
    if let Some(r) = slowest_queen_trade {
        w.add("slowestQueenTrade", both(&r.game), format!("move {}", r.moves));
    }
    if let Some(r) = longest_capture_sequence {
        w.add("longestCaptureSequence", both(&r.game), format!("{} in a row", r.length));
    }
    if let Some(r) = longest_check_sequence {
        w.add("longestCheckSequence", both(&r.game), format!("{} in a row", r.length));
    }
    if let Some(r) = pawn_storm {
        w.add("pawnStorm", both(&r.game), format!("{} pawn moves", r.count));
    }
    if let Some(r) = piece_loyalty {
        w.add("pieceLoyalty", both(&r.game), format!("{} moves", r.moves));
    }
    if let Some(r) = square_tourist {
        w.add("squareTourist", one(&r.game, r.color), format!("{} squares", r.squares));
    }
    if let Some(r) = castling_race {
        w.add("castlingRace", one(&r.game, r.winner), format!("move {}", r.moves));
    }
    if let Some(r) = opening_hipster {
        w.add("openingHipster", both(&r.game), format!("{} ({})", r.name, r.eco));
    }
    if let Some(r) = dadbod_shuffler {
        w.add("dadbodShuffler", one(&r.game, r.color), format!("{} king moves", r.moves));
    }
    if let Some(r) = sporty_queen {
        w.add("sportyQueen", one(&r.game, r.color), format!("{} squares", r.distance));
    }
    if let Some(r) = edge_lord {
        w.add("edgeLord", one(&r.game, r.color), format!("{} moves", r.moves));
    }
    if let Some(r) = rook_lift {
        w.add("rookLift", one(&r.game, r.color), format!("move {}", r.move_number));
    }
    if let Some(r) = center_stage {
        w.add("centerStage", one(&r.game, r.color), format!("{} moves", r.moves));
    }
    if let Some(r) = dark_lord {
        w.add("darkLord", one(&r.game, r.color), format!("{} captures", r.captures));
    }
    if let Some(r) = chicken_award {
        w.add("chickenAward", one(&r.game, r.color), format!("{} retreats", r.retreats));
    }
    if let Some(r) = homebody {
        w.add(
            "homebody",
            one(&r.game, r.player),
            format!("{} piece types crossed", r.pieces_in_enemy),
        );
    }
    if let Some(r) = late_bloomer {
        w.add("lateBloomer", one(&r.game, r.player), format!("move {}", r.move_number));
    }
    if let Some(r) = quick_draw {
        w.add("quickDraw", one(&r.game, r.player), format!("move {}", r.move_number));
    }
    if let Some(r) = crosshairs {
        w.add("crosshairs", both(&r.game), format!("{} attackers", r.attackers));
    }
    if let Some(r) = longest_tension {
        w.add("longestTension", both(&r.game), format!("{} moves", r.moves));
    }
    if let Some(r) = slowest_castling {
        w.add("slowestCastling", one(&r.game, r.color), format!("move {}", r.moves));
    }
    if let Some(r) = pawn_captures {
        w.add("pawnCaptures", one(&r.game, r.color), format!("{} captures", r.captures));
    }
    if let Some(r) = anti_orthogonal {
        w.add("antiOrthogonal", one(&r.game, r.color), format!("{} moves", r.moves));
    }
    if let Some(r) = comfort_zone {
        w.add(
            "comfortZone",
            one(&r.game, r.color),
            format!("{}% {}", r.percentage, r.piece_type),
        );
    }
    if let Some(r) = sunglasses {
        w.add("sunglasses", one(&r.game, r.color), format!("{} captures", r.captures));
    }
    if let Some(r) = most_premoves {
        w.add("mostPremoves", named(&r.player), format!("{} premoves", r.count));
    }
    if let Some(r) = longest_think {
        w.add("longestThink", named(&r.player), format!("{}s", r.time_spent));
    }
    if let Some(r) = zeitnot_addict {
        w.add("zeitnotAddict", named(&r.player), format!("{} moves", r.count));
    }
    if let Some(r) = time_scramble_survivor {
        w.add(
            "timeScrambleSurvivor",
            named(&r.player),
            format!("{}s left", r.min_clock),
        );
    }
    if let Some(r) = bullet_speed {
        w.add("bulletSpeed", named(&r.player), format!("{}s per move", r.avg_time));
    }
    if let Some(r) = sniper {
        w.add("sniper", named(&r.player), format!("{}s", r.time_spent));
    }
    if let Some(r) = opening_blitzer {
        w.add("openingBlitzer", named(&r.player), format!("{}s per move", r.avg_time));
    }
    if let Some(r) = sad_times {
        w.add("sadTimes", named(&r.player), format!("{}s", r.time_spent));
    }
    w.0
}

/// Whole-game awards and engine awards of a round.
pub fn other_award_wins(awards: &RoundAwards, summary: Option<&AnalysisSummary>) -> Vec<AwardWin> {
    let mut w = Wins::default();
    if let Some(r) = &awards.bloodbath {
        w.add("bloodbath", both(&r.game), format!("{} captures", r.captures));
    }
    if let Some(r) = &awards.pacifist {
        w.add("pacifist", both(&r.game), format!("{} captures", r.captures));
    }
    if let Some(r) = &awards.speed_demon {
        w.add("speedDemon", one(&r.game, r.winner), format!("mate in {} moves", r.moves));
    }
    if let Some(r) = &awards.endgame_wizard {
        w.add("endgameWizard", both(&r.game), format!("{} endgame moves", r.endgame_moves));
    }
    if let Some(r) = &awards.opening_sprinter {
        w.add(
            "openingSprinter",
            both(&r.game),
            format!("{} opening moves", r.opening_moves),
        );
    }
    if let Some(summary) = summary {
        if let Some(r) = &summary.accuracy_king {
            w.add("accuracyKing", named(&r.player), format!("{}% accuracy", r.accuracy));
        }
        if let Some(r) = &summary.biggest_blunder {
            w.add(
                "biggestBlunder",
                named(&r.player),
                format!("{} centipawns", r.blunder.cp_loss),
            );
        }
    }
    w.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analyzers::compute_fun_stats;
    use chess_core::parse_game;

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("edgeLord"), "Professional Edger");
        assert_eq!(display_name("accuracyKing"), "GM Energy");
        assert_eq!(display_name("somethingNew"), "somethingNew");
    }

    #[test]
    fn test_every_win_key_is_catalogued() {
        let game = parse_game(
            0,
            "[White \"Ann\"]\n[Black \"Bo\"]\n\n1. d4 e5 2. dxe5 d6 3. exd6 Nf6 4. dxc7 Nc6 \
             5. Nf3 Be7 6. Qxd8+ Bxd8 *",
        )
        .unwrap();
        let wins = fun_award_wins(&compute_fun_stats(&[&game], 0));
        assert!(!wins.is_empty());
        for win in &wins {
            assert!(FUN_AWARDS.iter().any(|(k, _)| *k == win.key), "{}", win.key);
        }
        let trade = wins.iter().find(|w| w.key == "fastestQueenTrade").unwrap();
        assert_eq!(trade.winners, vec!["Ann".to_string(), "Bo".to_string()]);
        assert_eq!(trade.details, "move 6");
    }

    #[test]
    fn test_empty_stats_have_no_wins() {
        assert!(fun_award_wins(&FunStats::default()).is_empty());
        assert!(other_award_wins(&RoundAwards::default(), None).is_empty());
    }
}
