//! Move generation used by `genmove` before the solver gets a say.
//!
//! The engine proposes a uniformly random legal move; `genmove` then asks the
//! solver whether it can do better.

use crate::board::{Board, Color, Point};

/// Picks a random legal move. Seedable for reproducible games.
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// A random legal move for `color`, or `None` if it has none.
    pub fn get_move(&mut self, board: &Board, color: Color) -> Option<Point> {
        let moves = board.legal_moves(color);
        self.rng.choice(moves)
    }
}
