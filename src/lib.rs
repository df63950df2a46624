//! NoGo-Solver: a GTP engine that plays and exactly solves NoGo.
//!
//! NoGo is Go where capturing is illegal; a player with no legal move loses.
//! The engine keeps a live board driven by GTP and, on request, runs an
//! exact win/loss search of the current position under a wall-clock limit.
//!
//! ## Modules
//!
//! - [`constants`] - Board size limits, special moves and engine defaults
//! - [`board`] - Board state, legality, move/undo and position hashing
//! - [`notation`] - Conversion between points and GTP vertices
//! - [`tt`] - Transposition table for the solver
//! - [`solver`] - Boolean negamax with memoization
//! - [`timeout`] - Deadlines and the time-bounded solve
//! - [`player`] - Random move generation for `genmove`
//! - [`config`] - Startup settings
//! - [`gtp`] - GTP command loop and command handlers
//!
//! ## Example
//!
//! ```
//! use nogo_solver::board::Board;
//! use nogo_solver::timeout::{solve_with_timeout, SolveResult};
//!
//! let board = Board::new(3).unwrap();
//! match solve_with_timeout(&board, 5) {
//!     SolveResult::Solved { to_play, outcome } => {
//!         println!("{:?} wins: {}", to_play, outcome.win);
//!     }
//!     SolveResult::Unknown => println!("out of time"),
//! }
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod gtp;
pub mod notation;
pub mod player;
pub mod solver;
pub mod timeout;
pub mod tt;
