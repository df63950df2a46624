//! Constants for board geometry, special moves and engine defaults.
//!
//! The board uses a 1D array representation with a one-point border, in the
//! same layout the GTP front end and the solver both index into:
//! `point = row * (size + 1) + col` with `row` and `col` in `1..=size`.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board size.
pub const MIN_SIZE: usize = 2;

/// Largest supported board size. Column letters run out past 25.
pub const MAX_SIZE: usize = 25;

/// Board size used when nothing else is configured.
pub const DEFAULT_SIZE: usize = 7;

/// Array length for a board of the given size (playable points plus border).
#[inline]
pub const fn board_len(size: usize) -> usize {
    size * size + 3 * (size + 1)
}

/// Array length of the largest supported board. Sizes the Zobrist tables.
pub const MAX_BOARD_LEN: usize = board_len(MAX_SIZE);

/// Column letters, skipping 'I' by Go convention.
pub const COLUMN_LETTERS: &[u8; MAX_SIZE] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker (index 0 is border, so safe to use).
pub const PASS_MOVE: usize = 0;

// =============================================================================
// Engine Defaults
// =============================================================================

/// Default solver time limit in whole seconds.
pub const DEFAULT_TIME_LIMIT: u64 = 1;

/// Engine name reported over GTP.
pub const ENGINE_NAME: &str = "nogo-solver";

/// Game id reported to GoGui.
pub const GAME_ID: &str = "NoGo";
