//! Sequence matcher for the tile memory game
//!
//! Classic "Simon" protocol: every round the reference sequence grows by one
//! random tile, is played back, then the player's taps are compared against
//! it position by position. The first divergence is terminal.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of submitting one tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Not accepting input (playback running, or matcher closed)
    Ignored,
    /// Correct tap, round not finished; `matched` taps correct so far
    Advanced { matched: usize },
    /// Correct tap that completed the round
    RoundComplete { length: usize },
    /// Wrong tap at `position`; the matcher closes
    Mismatch {
        position: usize,
        expected: usize,
        actual: usize,
    },
}

/// Growing reference pattern plus the current round's input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceMatcher {
    tile_count: usize,
    reference: Vec<usize>,
    input: Vec<usize>,
    expected_index: usize,
    accepting: bool,
}

impl SequenceMatcher {
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count: tile_count.max(1),
            reference: Vec::new(),
            input: Vec::new(),
            expected_index: 0,
            accepting: false,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn reference(&self) -> &[usize] {
        &self.reference
    }

    pub fn input(&self) -> &[usize] {
        &self.input
    }

    pub fn expected_index(&self) -> usize {
        self.expected_index
    }

    /// Tile the player must tap next, if input is open
    pub fn expected_tile(&self) -> Option<usize> {
        if !self.accepting {
            return None;
        }
        self.reference.get(self.expected_index).copied()
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Start a round with a uniformly chosen tile. Returns the appended tile.
    pub fn begin_round<R: Rng>(&mut self, rng: &mut R) -> usize {
        let tile = rng.random_range(0..self.tile_count);
        self.begin_round_with(tile);
        tile
    }

    /// Start a round appending `tile` (clamped into the tile set)
    pub fn begin_round_with(&mut self, tile: usize) {
        self.reference.push(tile.min(self.tile_count - 1));
        self.input.clear();
        self.expected_index = 0;
        self.accepting = false;
    }

    /// Offsets (ms from round start) at which each reference tile lights up,
    /// followed by the offset at which input opens.
    pub fn playback(&self, lead_in_ms: u64, interval_ms: u64, settle_ms: u64) -> (Vec<(u64, usize)>, u64) {
        let flashes = self
            .reference
            .iter()
            .enumerate()
            .map(|(i, &tile)| (lead_in_ms + i as u64 * interval_ms, tile))
            .collect();
        let open_at = lead_in_ms + self.reference.len() as u64 * interval_ms + settle_ms;
        (flashes, open_at)
    }

    /// Playback finished; taps count from now on
    pub fn open_input(&mut self) {
        if !self.reference.is_empty() {
            self.accepting = true;
        }
    }

    /// Compare one tap against the reference
    pub fn submit(&mut self, tile: usize) -> MatchOutcome {
        if !self.accepting {
            return MatchOutcome::Ignored;
        }
        self.input.push(tile);

        let position = self.expected_index;
        let expected = self.reference[position];
        if tile != expected {
            self.accepting = false;
            return MatchOutcome::Mismatch {
                position,
                expected,
                actual: tile,
            };
        }

        self.expected_index += 1;
        if self.expected_index == self.reference.len() {
            self.accepting = false;
            self.input.clear();
            self.expected_index = 0;
            MatchOutcome::RoundComplete {
                length: self.reference.len(),
            }
        } else {
            MatchOutcome::Advanced {
                matched: self.expected_index,
            }
        }
    }

    /// Stop accepting taps without touching the sequence
    pub fn close(&mut self) {
        self.accepting = false;
    }
}
