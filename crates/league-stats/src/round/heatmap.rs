//! Destination-square traffic across the round.

use chess_core::ParsedGame;
use serde::{Deserialize, Serialize};
use shakmaty::{File, Rank, Square};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareTraffic {
    pub square: String,
    pub visits: u32,
    pub captures: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareCaptures {
    pub square: String,
    pub captures: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareVisits {
    pub square: String,
    pub visits: u32,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardHeatmap {
    /// a1, a2, .., a8, b1, .., h8
    pub squares: Vec<SquareTraffic>,
    pub bloodiest_square: Option<SquareCaptures>,
    pub most_popular_square: Option<SquareVisits>,
    pub least_popular_square: Option<SquareVisits>,
    /// Never a move destination.
    pub quietest_squares: Vec<String>,
    pub top5_bloodiest: Vec<SquareCaptures>,
    pub top5_popular: Vec<SquareVisits>,
}

/// File-major order, the order ties are broken in.
fn file_major() -> impl Iterator<Item = Square> {
    File::ALL
        .into_iter()
        .flat_map(|file| Rank::ALL.into_iter().map(move |rank| Square::from_coords(file, rank)))
}

fn captures_entry(t: &SquareTraffic) -> SquareCaptures {
    SquareCaptures {
        square: t.square.clone(),
        captures: t.captures,
        description: format!("{} saw {} captures", t.square, t.captures),
    }
}

fn visits_entry(t: &SquareTraffic, description: String) -> SquareVisits {
    SquareVisits {
        square: t.square.clone(),
        visits: t.visits,
        description,
    }
}

pub fn board_heatmap(played: &[&ParsedGame]) -> BoardHeatmap {
    let mut visits = [0u32; 64];
    let mut captures = [0u32; 64];
    for game in played {
        for m in &game.moves {
            visits[usize::from(m.to)] += 1;
            if m.is_capture() {
                captures[usize::from(m.to)] += 1;
            }
        }
    }

    let squares: Vec<SquareTraffic> = file_major()
        .map(|sq| SquareTraffic {
            square: sq.to_string(),
            visits: visits[usize::from(sq)],
            captures: captures[usize::from(sq)],
        })
        .collect();

    let mut by_visits: Vec<&SquareTraffic> = squares.iter().collect();
    by_visits.sort_by(|a, b| b.visits.cmp(&a.visits));
    let mut by_captures: Vec<&SquareTraffic> = squares.iter().collect();
    by_captures.sort_by(|a, b| b.captures.cmp(&a.captures));

    let bloodiest_square = by_captures
        .first()
        .filter(|t| t.captures > 0)
        .map(|t| captures_entry(t));
    let most_popular_square = by_visits
        .first()
        .filter(|t| t.visits > 0)
        .map(|t| visits_entry(t, format!("{} was visited {} times", t.square, t.visits)));
    let least_popular_square = by_visits
        .iter()
        .rev()
        .find(|t| t.visits > 0)
        .map(|t| visits_entry(t, format!("{} was only visited {} times", t.square, t.visits)));

    let quietest_squares = squares
        .iter()
        .filter(|t| t.visits == 0)
        .map(|t| t.square.clone())
        .collect();
    let top5_bloodiest = by_captures.iter().take(5).map(|t| captures_entry(t)).collect();
    let top5_popular = by_visits
        .iter()
        .take(5)
        .map(|t| visits_entry(t, format!("{} was visited {} times", t.square, t.visits)))
        .collect();

    BoardHeatmap {
        bloodiest_square,
        most_popular_square,
        least_popular_square,
        quietest_squares,
        top5_bloodiest,
        top5_popular,
        squares,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::parse_game;

    #[test]
    fn test_heatmap_extremes() {
        let a = parse_game(0, "1. e4 d5 2. exd5 Qxd5 3. Nc3 Qd8 *").unwrap();
        let b = parse_game(1, "1. e4 e5 *").unwrap();
        let heat = board_heatmap(&[&a, &b]);

        assert_eq!(heat.squares.len(), 64);
        assert_eq!(heat.squares[0].square, "a1");
        assert_eq!(heat.squares[1].square, "a2");

        let bloodiest = heat.bloodiest_square.unwrap();
        assert_eq!(bloodiest.square, "d5");
        assert_eq!(bloodiest.captures, 2);
        assert_eq!(bloodiest.description, "d5 saw 2 captures");

        let popular = heat.most_popular_square.unwrap();
        assert_eq!(popular.square, "d5");
        assert_eq!(popular.visits, 3);

        // e4 twice; c3, d8, e5 once each: the last of those in file order wins.
        let least = heat.least_popular_square.unwrap();
        assert_eq!(least.square, "e5");
        assert_eq!(least.description, "e5 was only visited 1 times");

        assert_eq!(heat.quietest_squares.len(), 64 - 5);
        assert_eq!(heat.top5_popular[1].square, "e4");
        assert_eq!(heat.top5_bloodiest.len(), 5);
    }

    #[test]
    fn test_empty_round() {
        let heat = board_heatmap(&[]);
        assert!(heat.bloodiest_square.is_none());
        assert!(heat.most_popular_square.is_none());
        assert!(heat.least_popular_square.is_none());
        assert_eq!(heat.quietest_squares.len(), 64);
    }
}
