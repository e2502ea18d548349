//! Shared shapes for superlative records and the tie-break rule.

use chess_core::{ParsedGame, Side};
use serde::{Deserialize, Serialize};

/// Provenance carried by every record: which game, who played it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRef {
    pub game_index: usize,
    pub game_id: Option<String>,
    pub white: String,
    pub black: String,
}

impl GameRef {
    pub fn of(game: &ParsedGame) -> Self {
        Self {
            game_index: game.index,
            game_id: game.game_id(),
            white: game.white().to_string(),
            black: game.black().to_string(),
        }
    }

    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }
}

/// Keeps the best-keyed candidate seen so far.
///
/// Only a strictly better key replaces the incumbent, so among equal keys
/// the first candidate offered wins.
#[derive(Debug, Clone)]
pub struct Extremum<K, R> {
    prefer_max: bool,
    best: Option<(K, R)>,
}

impl<K: PartialOrd + Copy, R> Extremum<K, R> {
    pub fn max() -> Self {
        Self {
            prefer_max: true,
            best: None,
        }
    }

    pub fn min() -> Self {
        Self {
            prefer_max: false,
            best: None,
        }
    }

    pub fn beats(&self, key: K) -> bool {
        match &self.best {
            None => true,
            Some((incumbent, _)) if self.prefer_max => key > *incumbent,
            Some((incumbent, _)) => key < *incumbent,
        }
    }

    pub fn offer(&mut self, key: K, build: impl FnOnce() -> R) {
        if self.beats(key) {
            self.best = Some((key, build()));
        }
    }

    pub fn key(&self) -> Option<K> {
        self.best.as_ref().map(|(k, _)| *k)
    }

    pub fn get(&self) -> Option<&R> {
        self.best.as_ref().map(|(_, r)| r)
    }

    pub fn into_record(self) -> Option<R> {
        self.best.map(|(_, r)| r)
    }
}

/// Per-side counter folded into a round-wide maximum. White is offered
/// before Black, zero counts never qualify.
#[derive(Debug, Clone)]
pub struct SideTally {
    counts: [u32; 2],
    best: Extremum<u32, (Side, GameRef)>,
}

impl Default for SideTally {
    fn default() -> Self {
        Self {
            counts: [0; 2],
            best: Extremum::max(),
        }
    }
}

impl SideTally {
    pub fn reset(&mut self) {
        self.counts = [0; 2];
    }

    pub fn add(&mut self, side: Side, n: u32) {
        self.counts[side as usize] += n;
    }

    pub fn count(&self, side: Side) -> u32 {
        self.counts[side as usize]
    }

    pub fn finish(&mut self, game: &ParsedGame) {
        for side in Side::BOTH {
            let count = self.count(side);
            if count > 0 {
                self.best.offer(count, || (side, GameRef::of(game)));
            }
        }
    }

    pub fn into_best(self) -> Option<(u32, Side, GameRef)> {
        let count = self.best.key()?;
        self.best.into_record().map(|(side, game)| (count, side, game))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremum_keeps_first_on_tie() {
        let mut best = Extremum::max();
        best.offer(3, || "first");
        best.offer(3, || "second");
        best.offer(2, || "smaller");
        assert_eq!(best.into_record(), Some("first"));

        let mut low = Extremum::min();
        low.offer(5.0, || 'a');
        low.offer(4.5, || 'b');
        low.offer(4.5, || 'c');
        assert_eq!(low.into_record(), Some('b'));
    }

    #[test]
    fn test_empty_extremum_has_no_record() {
        let best: Extremum<u32, ()> = Extremum::max();
        assert!(best.key().is_none());
        assert!(best.into_record().is_none());
    }
}
