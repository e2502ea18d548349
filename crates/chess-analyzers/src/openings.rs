//! Named opening lines, matched on the longest known SAN prefix.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Opening {
    pub eco: &'static str,
    pub name: &'static str,
}

impl Opening {
    /// Longer, more specific names score higher; a named variation
    /// (`Family: Variation`) earns a flat bonus.
    pub fn obscurity_score(&self) -> u32 {
        let base = self.name.chars().count() as u32;
        if self.name.contains(':') {
            base + 20
        } else {
            base
        }
    }
}

const LINES: &[(&str, &str, &str)] = &[
    ("e4", "B00", "King's Pawn Opening"),
    ("e4 e5", "C20", "King's Pawn Opening"),
    ("e4 e5 Nf3", "C40", "King's Knight Opening"),
    ("e4 e5 Nf3 Nc6", "C44", "King's Pawn Game"),
    ("e4 e5 Nf3 Nc6 Bb5", "C60", "Ruy Lopez"),
    ("e4 e5 Nf3 Nc6 Bb5 a6", "C70", "Ruy Lopez: Morphy Defense"),
    ("e4 e5 Nf3 Nc6 Bb5 Nf6", "C65", "Ruy Lopez: Berlin Defense"),
    ("e4 e5 Nf3 Nc6 Bc4", "C50", "Italian Game"),
    ("e4 e5 Nf3 Nc6 Bc4 Bc5", "C50", "Italian Game: Giuoco Piano"),
    ("e4 e5 Nf3 Nc6 Bc4 Nf6", "C55", "Italian Game: Two Knights Defense"),
    ("e4 e5 Nf3 Nc6 d4", "C44", "Scotch Game"),
    ("e4 e5 Nf3 Nc6 d4 exd4", "C45", "Scotch Game"),
    ("e4 e5 Nf3 Nc6 Nc3", "C46", "Four Knights Game"),
    ("e4 e5 Nf3 Nc6 Nc3 Nf6", "C47", "Four Knights Game"),
    ("e4 e5 Nf3 Nf6", "C42", "Petrov Defense"),
    ("e4 e5 Nf3 d6", "C41", "Philidor Defense"),
    ("e4 e5 Nf3 f5", "C40", "Latvian Gambit"),
    ("e4 e5 f4", "C30", "King's Gambit"),
    ("e4 e5 f4 exf4", "C33", "King's Gambit Accepted"),
    ("e4 e5 Nc3", "C25", "Vienna Game"),
    ("e4 e5 Bc4", "C23", "Bishop's Opening"),
    ("e4 e5 Qh5", "C20", "King's Pawn Opening: Wayward Queen Attack"),
    ("e4 e5 d4 exd4", "C21", "Center Game"),
    ("e4 c5", "B20", "Sicilian Defense"),
    ("e4 c5 Nf3", "B27", "Sicilian Defense"),
    ("e4 c5 Nf3 d6", "B50", "Sicilian Defense: Najdorf Variation"),
    ("e4 c5 Nf3 Nc6", "B30", "Sicilian Defense: Open"),
    ("e4 c5 Nf3 e6", "B40", "Sicilian Defense: French Variation"),
    ("e4 c5 c3", "B22", "Sicilian Defense: Alapin Variation"),
    ("e4 c5 Nc3", "B23", "Sicilian Defense: Closed"),
    ("e4 c5 d4 cxd4 c3", "B21", "Sicilian Defense: Smith-Morra Gambit"),
    ("e4 e6", "C00", "French Defense"),
    ("e4 e6 d4", "C00", "French Defense"),
    ("e4 e6 d4 d5", "C01", "French Defense"),
    ("e4 e6 d4 d5 Nc3", "C10", "French Defense: Classical"),
    ("e4 e6 d4 d5 Nd2", "C03", "French Defense: Tarrasch"),
    ("e4 e6 d4 d5 e5", "C02", "French Defense: Advance Variation"),
    ("e4 e6 d4 d5 exd5", "C01", "French Defense: Exchange Variation"),
    ("e4 c6", "B10", "Caro-Kann Defense"),
    ("e4 c6 d4", "B12", "Caro-Kann Defense"),
    ("e4 c6 d4 d5", "B12", "Caro-Kann Defense"),
    ("e4 c6 d4 d5 Nc3", "B15", "Caro-Kann Defense: Classical"),
    ("e4 c6 d4 d5 Nd2", "B15", "Caro-Kann Defense: Two Knights"),
    ("e4 c6 d4 d5 e5", "B12", "Caro-Kann Defense: Advance Variation"),
    ("e4 c6 d4 d5 exd5", "B13", "Caro-Kann Defense: Exchange Variation"),
    ("e4 d6", "B07", "Pirc Defense"),
    ("e4 g6", "B06", "Modern Defense"),
    ("e4 Nf6", "B02", "Alekhine Defense"),
    ("e4 d5", "B01", "Scandinavian Defense"),
    ("e4 d5 exd5 Qxd5", "B01", "Scandinavian Defense: Mieses-Kotroc Variation"),
    ("e4 Nc6", "B00", "Nimzowitsch Defense"),
    ("e4 b6", "B00", "Owen Defense"),
    ("e4 a6", "B00", "St. George Defense"),
    ("d4", "A40", "Queen's Pawn Game"),
    ("d4 d5", "D00", "Queen's Pawn Game"),
    ("d4 d5 c4", "D06", "Queen's Gambit"),
    ("d4 d5 c4 e6", "D30", "Queen's Gambit Declined"),
    ("d4 d5 c4 c6", "D10", "Queen's Gambit: Slav Defense"),
    ("d4 d5 c4 dxc4", "D20", "Queen's Gambit Accepted"),
    ("d4 d5 c4 e5", "D08", "Queen's Gambit: Albin Countergambit"),
    ("d4 d5 Nf3", "D02", "Queen's Pawn Game"),
    ("d4 d5 Nf3 Nf6", "D02", "Queen's Pawn Game"),
    ("d4 d5 Nf3 Nf6 c4", "D06", "Queen's Gambit"),
    ("d4 d5 Bf4", "D00", "Queen's Pawn Game: London System"),
    ("d4 d5 e3", "D00", "Queen's Pawn Game: Colle System"),
    ("d4 Nf6", "A45", "Indian Defense"),
    ("d4 Nf6 Bf4", "A45", "Indian Defense: London System"),
    ("d4 Nf6 c4", "A50", "Indian Game"),
    ("d4 Nf6 c4 e6", "E00", "Nimzo-Indian/Queen's Indian"),
    ("d4 Nf6 c4 e6 Nc3", "E20", "Nimzo-Indian Defense"),
    ("d4 Nf6 c4 e6 Nc3 Bb4", "E20", "Nimzo-Indian Defense"),
    ("d4 Nf6 c4 g6", "E60", "King's Indian Defense"),
    ("d4 Nf6 c4 g6 Nc3", "E61", "King's Indian Defense"),
    ("d4 Nf6 c4 g6 Nc3 Bg7", "E61", "King's Indian Defense"),
    ("d4 Nf6 c4 e6 Nf3", "E10", "Queen's Indian Defense"),
    ("d4 Nf6 c4 e6 Nf3 b6", "E12", "Queen's Indian Defense"),
    ("d4 Nf6 Nf3 g6", "A48", "King's Indian Defense"),
    ("d4 Nf6 Nf3 e6", "A46", "Indian Defense"),
    ("d4 Nf6 Nf3 d5", "D02", "Queen's Pawn Game"),
    ("d4 Nf6 c4 g6 Nc3 d5", "D80", "Grünfeld Defense"),
    ("d4 Nf6 c4 c5", "A56", "Benoni Defense"),
    ("d4 Nf6 c4 c5 d5 b5", "A57", "Benko Gambit"),
    ("d4 f5", "A80", "Dutch Defense"),
    ("d4 f5 c4", "A84", "Dutch Defense"),
    ("d4 f5 g3", "A81", "Dutch Defense: Leningrad"),
    ("d4 e5", "A40", "Englund Gambit"),
    ("d4 e6", "A40", "Horwitz Defense"),
    ("c4", "A10", "English Opening"),
    ("c4 e5", "A20", "English Opening: King's English"),
    ("c4 Nf6", "A15", "English Opening"),
    ("c4 c5", "A30", "English Opening: Symmetrical"),
    ("c4 e6", "A13", "English Opening"),
    ("c4 g6", "A10", "English Opening: King's Fianchetto"),
    ("Nf3", "A04", "Réti Opening"),
    ("Nf3 d5", "A06", "Réti Opening"),
    ("Nf3 Nf6", "A05", "Réti Opening"),
    ("Nf3 d5 c4", "A09", "Réti Opening"),
    ("Nf3 d5 g3", "A07", "King's Indian Attack"),
    ("f4", "A02", "Bird's Opening"),
    ("f4 d5", "A03", "Bird's Opening"),
    ("f4 e5", "A02", "Bird's Opening: From's Gambit"),
    ("b3", "A01", "Larsen's Opening"),
    ("g3", "A00", "King's Fianchetto Opening"),
    ("Nc3", "A00", "Dunst Opening"),
    ("b4", "A00", "Polish Opening"),
    ("e3", "A00", "Van't Kruijs Opening"),
    ("d3", "A00", "Mieses Opening"),
    ("a3", "A00", "Anderssen's Opening"),
    ("h3", "A00", "Clemenz Opening"),
    ("g4", "A00", "Grob Opening"),
    ("Na3", "A00", "Sodium Attack"),
    ("Nh3", "A00", "Amar Opening"),
];

/// Built once; keyed by space-joined SAN without check suffixes.
static OPENINGS: LazyLock<HashMap<&'static str, Opening>> = LazyLock::new(|| {
    LINES
        .iter()
        .map(|&(moves, eco, name)| (moves, Opening { eco, name }))
        .collect()
});

fn strip_suffix(san: &str) -> &str {
    san.trim_end_matches(['+', '#'])
}

/// Longest known prefix of `moves`.
pub fn lookup<S: AsRef<str>>(moves: &[S]) -> Option<Opening> {
    let plain: Vec<&str> = moves.iter().map(|m| strip_suffix(m.as_ref())).collect();
    (1..=plain.len())
        .rev()
        .find_map(|n| OPENINGS.get(plain[..n].join(" ").as_str()).copied())
}

/// Same as [`lookup`] for a space-separated sequence.
pub fn lookup_sequence(sequence: &str) -> Option<Opening> {
    let moves: Vec<&str> = sequence.split_whitespace().collect();
    lookup(&moves)
}
