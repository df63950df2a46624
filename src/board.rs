//! NoGo board representation and move execution.
//!
//! NoGo is played on a Go board, but any move that captures is illegal and so
//! is suicide. A player with no legal move loses. Since stones are never
//! removed, undoing a move only means emptying the point again and restoring
//! the move-history fields, which is what [`MoveGuard`] does.
//!
//! The board is a 1D array with a one-point border:
//! - `NS = size + 1` is the row stride
//! - `point = row * NS + col` for `row, col` in `1..=size`
//! - column 0 of every row and rows 0 and `size + 1` are [`Cell::Border`]

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use thiserror::Error;

use crate::constants::{COLUMN_LETTERS, MAX_BOARD_LEN, MAX_SIZE, MIN_SIZE, PASS_MOVE, board_len};

/// A point on the board, represented as an index into the 1D board array.
pub type Point = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-letter GTP form: `b` or `w`.
    pub fn letter(self) -> &'static str {
        match self {
            Color::Black => "b",
            Color::White => "w",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

/// Contents of one array slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
    Border,
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// Why a move was rejected. The board is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("pass is not allowed")]
    Pass,
    #[error("point is off the board")]
    OffBoard,
    #[error("point is not empty")]
    Occupied,
    #[error("move would capture")]
    Capture,
    #[error("move would be suicide")]
    Suicide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("board size {0} out of range ({min}..={max})", min = MIN_SIZE, max = MAX_SIZE)]
pub struct BoardSizeError(pub usize);

/// Mutable move-history state captured before a move is explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub last_move: Option<Point>,
    pub last2_move: Option<Point>,
    pub current_player: Color,
}

/// Zobrist keys, one per (color, point) plus one for White to move.
struct Zobrist {
    stones: [Vec<u64>; 2],
    white_to_move: u64,
}

/// Keys are drawn from a fixed seed so hashes are identical across runs.
fn zobrist() -> &'static Zobrist {
    static KEYS: OnceLock<Zobrist> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut rng = fastrand::Rng::with_seed(0x9E37_79B9_7F4A_7C15);
        let black = (0..MAX_BOARD_LEN).map(|_| rng.u64(..)).collect();
        let white = (0..MAX_BOARD_LEN).map(|_| rng.u64(..)).collect();
        Zobrist {
            stones: [black, white],
            white_to_move: rng.u64(..),
        }
    })
}

/// A NoGo position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Number of rows and columns
    pub size: usize,
    /// Row stride of the 1D array (`size + 1`)
    pub ns: usize,
    /// Board contents including the border
    cells: Vec<Cell>,
    /// Side to move
    pub current_player: Color,
    /// Last move played
    pub last_move: Option<Point>,
    /// Second-to-last move
    pub last2_move: Option<Point>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(crate::constants::DEFAULT_SIZE)
    }
}

impl Board {
    pub fn new(size: usize) -> Result<Self, BoardSizeError> {
        check_size(size)?;
        Ok(Self::empty(size))
    }

    fn empty(size: usize) -> Self {
        let mut board = Board {
            size,
            ns: size + 1,
            cells: Vec::new(),
            current_player: Color::Black,
            last_move: None,
            last2_move: None,
        };
        board.clear();
        board
    }

    /// Reset to an empty board of the given size with Black to move.
    pub fn reset(&mut self, size: usize) -> Result<(), BoardSizeError> {
        check_size(size)?;
        self.size = size;
        self.ns = size + 1;
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.cells = vec![Cell::Border; board_len(self.size)];
        for row in 1..=self.size {
            let start = self.row_start(row);
            self.cells[start..start + self.size].fill(Cell::Empty);
        }
        self.current_player = Color::Black;
        self.last_move = None;
        self.last2_move = None;
    }

    /// First point of a 1-based row.
    #[inline]
    pub fn row_start(&self, row: usize) -> Point {
        row * self.ns + 1
    }

    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point {
        row * self.ns + col
    }

    /// Contents of a point; anything outside the array reads as border.
    #[inline]
    pub fn get(&self, pt: Point) -> Cell {
        self.cells.get(pt).copied().unwrap_or(Cell::Border)
    }

    /// Overwrite a point without any legality checks.
    #[inline]
    pub fn set_point(&mut self, pt: Point, cell: Cell) {
        self.cells[pt] = cell;
    }

    /// All empty points in ascending index order.
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == Cell::Empty)
            .map(|(pt, _)| pt)
    }

    #[inline]
    fn neighbors(&self, pt: Point) -> [Point; 4] {
        [pt - self.ns, pt + 1, pt + self.ns, pt - 1]
    }

    /// Check a move without playing it.
    pub fn check_move(&self, pt: Point, color: Color) -> Result<(), MoveError> {
        if pt == PASS_MOVE {
            return Err(MoveError::Pass);
        }
        match self.get(pt) {
            Cell::Empty => {}
            Cell::Border => return Err(MoveError::OffBoard),
            Cell::Black | Cell::White => return Err(MoveError::Occupied),
        }

        let opp = Cell::from(color.opponent());
        for n in self.neighbors(pt) {
            if self.cells[n] == opp && !self.has_liberty(n, pt, color) {
                return Err(MoveError::Capture);
            }
        }
        if !self.has_liberty(pt, pt, color) {
            return Err(MoveError::Suicide);
        }
        Ok(())
    }

    #[inline]
    pub fn is_legal(&self, pt: Point, color: Color) -> bool {
        self.check_move(pt, color).is_ok()
    }

    /// Legal moves for `color`, in ascending point order.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.empty_points()
            .filter(|&pt| self.is_legal(pt, color))
            .collect()
    }

    /// Play a move for `color`. The opponent of `color` moves next.
    pub fn play(&mut self, pt: Point, color: Color) -> Result<(), MoveError> {
        self.check_move(pt, color)?;
        self.cells[pt] = Cell::from(color);
        self.current_player = color.opponent();
        self.last2_move = self.last_move;
        self.last_move = Some(pt);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            last_move: self.last_move,
            last2_move: self.last2_move,
            current_player: self.current_player,
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.last_move = snapshot.last_move;
        self.last2_move = snapshot.last2_move;
        self.current_player = snapshot.current_player;
    }

    /// Play `pt` for the side to move and hand back a guard that undoes it.
    ///
    /// The guard dereferences to the board, so the caller searches the child
    /// position through it. Dropping the guard empties `pt` and restores the
    /// snapshot, whichever way the caller leaves its scope.
    pub fn explore(&mut self, pt: Point) -> Result<MoveGuard<'_>, MoveError> {
        let snapshot = self.snapshot();
        self.play(pt, self.current_player)?;
        Ok(MoveGuard {
            board: self,
            point: pt,
            snapshot,
        })
    }

    /// Deterministic Zobrist hash of the stones and the side to move.
    pub fn hash_code(&self) -> u64 {
        let keys = zobrist();
        let mut h = match self.current_player {
            Color::Black => 0,
            Color::White => keys.white_to_move,
        };
        for (pt, cell) in self.cells.iter().enumerate() {
            match cell {
                Cell::Black => h ^= keys.stones[0][pt],
                Cell::White => h ^= keys.stones[1][pt],
                Cell::Empty | Cell::Border => {}
            }
        }
        h
    }

    /// Rows from top to bottom as `X`, `O` and `.`, one line per row.
    pub fn rules_board_string(&self) -> String {
        let mut s = String::with_capacity(self.size * (self.size + 1));
        for row in (1..=self.size).rev() {
            let start = self.row_start(row);
            for pt in start..start + self.size {
                s.push(cell_char(self.cells[pt]));
            }
            s.push('\n');
        }
        s
    }

    /// Flood-fill the block at `start` looking for an empty neighbor,
    /// treating `placed` as already holding a `placed_color` stone.
    fn has_liberty(&self, start: Point, placed: Point, placed_color: Color) -> bool {
        let at = |q: Point| {
            if q == placed {
                Cell::from(placed_color)
            } else {
                self.cells[q]
            }
        };
        if self.neighbors(start).into_iter().any(|n| at(n) == Cell::Empty) {
            return true;
        }

        let color = at(start);
        let mut stack = vec![start];
        let mut visited = [false; MAX_BOARD_LEN];
        visited[start] = true;

        while let Some(pt) = stack.pop() {
            for n in self.neighbors(pt) {
                match at(n) {
                    Cell::Empty => return true,
                    c if c == color && !visited[n] => {
                        visited[n] = true;
                        stack.push(n);
                    }
                    _ => {}
                }
            }
        }
        false
    }
}

fn check_size(size: usize) -> Result<(), BoardSizeError> {
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(BoardSizeError(size))
    }
}

fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Black => 'X',
        Cell::White => 'O',
        Cell::Empty => '.',
        Cell::Border => ' ',
    }
}

/// An explored move; undone when dropped.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    point: Point,
    snapshot: Snapshot,
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.set_point(self.point, Cell::Empty);
        self.board.restore(self.snapshot);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.size).rev() {
            write!(f, "{row:>2} ")?;
            let start = self.row_start(row);
            for pt in start..start + self.size {
                write!(f, "{} ", cell_char(self.cells[pt]))?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for &letter in &COLUMN_LETTERS[..self.size] {
            write!(f, "{} ", letter as char)?;
        }
        writeln!(f)
    }
}
