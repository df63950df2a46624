//! Time-bounded search.
//!
//! The solver polls a [`Deadline`] on entry to every node, so an expired
//! time limit unwinds the whole search through `?` and is reported as
//! [`SolveResult::Unknown`] rather than as a win or a loss. Limits are whole
//! seconds; a limit of 0 is already expired when the search starts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::{Board, Color};
use crate::solver::{Outcome, SearchAborted, Solver};

/// When a search has to stop.
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    at: Option<Instant>,
    stop: Option<Arc<AtomicBool>>,
}

impl Deadline {
    /// A deadline that never passes.
    pub fn never() -> Self {
        Self::default()
    }

    /// A limit too large to represent as an instant never passes.
    pub fn after(limit: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(limit),
            stop: None,
        }
    }

    pub fn after_secs(secs: u64) -> Self {
        Self::after(Duration::from_secs(secs))
    }

    /// Also stop once `flag` is set, e.g. from a Ctrl-C handler.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    #[inline]
    pub fn expired(&self) -> bool {
        if let Some(flag) = &self.stop
            && flag.load(Ordering::Relaxed)
        {
            return true;
        }
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Result of a time-bounded solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveResult {
    /// The search finished; the outcome is for `to_play`.
    Solved { to_play: Color, outcome: Outcome },
    /// The deadline passed first.
    Unknown,
}

impl SolveResult {
    /// The proven winner, if the search finished.
    pub fn winner(&self) -> Option<Color> {
        match *self {
            SolveResult::Solved { to_play, outcome } if outcome.win => Some(to_play),
            SolveResult::Solved { to_play, .. } => Some(to_play.opponent()),
            SolveResult::Unknown => None,
        }
    }
}

/// Solve a private copy of `board` within `time_limit` seconds.
pub fn solve_with_timeout(board: &Board, time_limit: u64) -> SolveResult {
    solve_until(board, Deadline::after_secs(time_limit))
}

/// Solve a private copy of `board`, giving up when `deadline` passes.
pub fn solve_until(board: &Board, deadline: Deadline) -> SolveResult {
    let mut scratch = board.clone();
    let mut solver = Solver::new(deadline);
    let start = Instant::now();
    let result = solver.solve(&mut scratch);
    let stats = solver.stats();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(outcome) => {
            debug_assert_eq!(&scratch, board, "solver left the board modified");
            debug!(
                win = outcome.win,
                nodes = stats.nodes,
                tt_hits = stats.tt_hits,
                tt_entries = solver.table().len(),
                elapsed_ms,
                "solve finished"
            );
            SolveResult::Solved {
                to_play: board.current_player,
                outcome,
            }
        }
        Err(SearchAborted) => {
            debug!(nodes = stats.nodes, elapsed_ms, "solve timed out");
            SolveResult::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_never_and_zero() {
        assert!(!Deadline::never().expired());
        assert!(Deadline::after_secs(0).expired());
        assert!(!Deadline::after_secs(3600).expired());
    }

    #[test]
    fn test_huge_limit_never_expires() {
        assert!(!Deadline::after_secs(u64::MAX).expired());
        assert!(!Deadline::after(Duration::MAX).expired());
        let board = Board::new(3).unwrap();
        assert_eq!(
            solve_with_timeout(&board, u64::MAX).winner(),
            Some(Color::Black)
        );
    }

    #[test]
    fn test_stop_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let deadline = Deadline::never().with_stop_flag(flag.clone());
        assert!(!deadline.expired());
        flag.store(true, Ordering::Relaxed);
        assert!(deadline.expired());
    }

    #[test]
    fn test_zero_time_limit_is_unknown() {
        let board = Board::new(5).unwrap();
        assert_eq!(solve_with_timeout(&board, 0), SolveResult::Unknown);
    }

    #[test]
    fn test_solved_within_limit() {
        let board = Board::new(3).unwrap();
        let result = solve_with_timeout(&board, 10);
        assert!(matches!(
            result,
            SolveResult::Solved { to_play: Color::Black, outcome } if outcome.win
        ));
        assert_eq!(result.winner(), Some(Color::Black));
    }

    #[test]
    fn test_live_board_untouched() {
        let mut board = Board::new(3).unwrap();
        board.play(board.point(2, 2), Color::Black).unwrap();
        let before = board.clone();
        let result = solve_with_timeout(&board, 10);
        assert_eq!(result.winner(), Some(Color::Black));
        assert_eq!(board, before);
    }

    #[test]
    fn test_unknown_has_no_winner() {
        assert_eq!(SolveResult::Unknown.winner(), None);
    }
}
