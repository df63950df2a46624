//! Engine settings chosen at startup.
//!
//! The command line fills these in; `boardsize` and `timelimit` can change
//! the corresponding values later over GTP.

use crate::constants::{DEFAULT_SIZE, DEFAULT_TIME_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Initial board size
    pub size: usize,
    /// Solver time limit in seconds
    pub time_limit: u64,
    /// Seed for the random move generator; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            time_limit: DEFAULT_TIME_LIMIT,
            seed: None,
        }
    }
}
