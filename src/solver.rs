//! Exact NoGo solver: boolean negamax over the legal-move tree.
//!
//! Every position is either a win or a loss for the side to move, so the
//! search only needs a boolean: a position is won iff some legal move leads to
//! a position that is lost for the opponent. Results are memoized in a
//! [`TranspositionTable`] keyed by [`Board::hash_code`].
//!
//! The board is mutated in place. Each candidate move is applied through
//! [`Board::explore`], whose guard restores the board when it goes out of
//! scope, so the board is identical after every explored branch, including
//! the early return on a proven win and the unwind on abort.

use thiserror::Error;

use crate::board::{Board, Point};
use crate::timeout::Deadline;
use crate::tt::TranspositionTable;

/// Search stopped before reaching a verdict (deadline passed or stop flag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search aborted")]
pub struct SearchAborted;

/// Verdict for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// True iff the side to move wins with best play
    pub win: bool,
    /// First move found that proves the win. `None` for losses and for wins
    /// read back from the transposition table.
    pub proving_move: Option<Point>,
}

impl Outcome {
    pub const LOSS: Outcome = Outcome {
        win: false,
        proving_move: None,
    };

    fn win(mv: Point) -> Self {
        Outcome {
            win: true,
            proving_move: Some(mv),
        }
    }

    fn cached(win: bool) -> Self {
        Outcome {
            win,
            proving_move: None,
        }
    }
}

/// Counters for one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions entered
    pub nodes: u64,
    /// Positions answered from the table
    pub tt_hits: u64,
    /// Positions decided by the no-legal-move rule
    pub terminal: u64,
}

pub struct Solver {
    tt: TranspositionTable,
    deadline: Deadline,
    stats: SearchStats,
}

impl Solver {
    pub fn new(deadline: Deadline) -> Self {
        Self {
            tt: TranspositionTable::new(),
            deadline,
            stats: SearchStats::default(),
        }
    }

    /// Solve the position for the side to move.
    ///
    /// Starts from an empty table. On `Ok` the board is left exactly as it
    /// was passed in.
    pub fn solve(&mut self, board: &mut Board) -> Result<Outcome, SearchAborted> {
        self.tt.clear();
        self.stats = SearchStats::default();
        self.negamax(board)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.tt
    }

    fn negamax(&mut self, board: &mut Board) -> Result<Outcome, SearchAborted> {
        if self.deadline.expired() {
            return Err(SearchAborted);
        }
        self.stats.nodes += 1;

        let hash = board.hash_code();
        if let Some(win) = self.tt.lookup(hash) {
            self.stats.tt_hits += 1;
            return Ok(Outcome::cached(win));
        }

        let to_play = board.current_player;
        let moves = board.legal_moves(to_play);
        let Some(&first) = moves.first() else {
            self.stats.terminal += 1;
            self.tt.store(hash, false);
            return Ok(Outcome::LOSS);
        };

        // The opponent has no reply in this position, before we move. This is
        // not the test negamax makes one ply deeper; it scores a win without
        // searching and the first legal move stands as the proof.
        if board.legal_moves(to_play.opponent()).is_empty() {
            self.stats.terminal += 1;
            self.tt.store(hash, true);
            return Ok(Outcome::win(first));
        }

        for mv in moves {
            let Ok(mut child) = board.explore(mv) else {
                continue;
            };
            let opponent_wins = self.negamax(&mut child)?.win;
            drop(child);

            if !opponent_wins {
                self.tt.store(hash, true);
                return Ok(Outcome::win(mv));
            }
        }

        self.tt.store(hash, false);
        Ok(Outcome::LOSS)
    }
}
