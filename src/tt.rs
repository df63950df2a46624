//! Transposition table for the exact solver.
//!
//! Maps a position hash to whether the side to move in that position wins.
//! Entries are written once and never evicted; the table lives for a single
//! solve and is dropped with it.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TranspositionTable {
    table: HashMap<u64, bool>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn lookup(&self, hash: u64) -> Option<bool> {
        self.table.get(&hash).copied()
    }

    /// Record a result and hand it back, so callers can `return tt.store(..)`.
    #[inline]
    pub fn store(&mut self, hash: u64, win: bool) -> bool {
        self.table.insert(hash, win);
        win
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
