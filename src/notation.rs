//! Conversion between board points and GTP vertex notation.
//!
//! GTP vertices are a column letter (A-Z, skipping I) followed by a 1-based
//! row number, e.g. `C4`, or the word `pass`. Rows count from the bottom.

use thiserror::Error;

use crate::board::{Color, Point};
use crate::constants::{COLUMN_LETTERS, MAX_SIZE, MIN_SIZE, PASS_MOVE};

/// A point as `(row, col)` with both 1-based, or a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coord {
    Pass,
    Point { row: usize, col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid point: '{0}'")]
    InvalidPoint(String),
    #[error("point off board: '{0}'")]
    OffBoard(String),
    #[error("coordinate out of range: ({row}, {col})")]
    OutOfRange { row: usize, col: usize },
    #[error("board size out of range: {0}")]
    BoardSizeOutOfRange(usize),
    #[error("invalid color: '{0}'")]
    InvalidColor(String),
}

/// Split a board index into `(row, col)`. `PASS_MOVE` stays a pass.
pub fn point_to_coord(pt: Point, board_size: usize) -> Coord {
    if pt == PASS_MOVE {
        return Coord::Pass;
    }
    let ns = board_size + 1;
    Coord::Point {
        row: pt / ns,
        col: pt % ns,
    }
}

/// Inverse of [`point_to_coord`].
pub fn coord_to_point(coord: Coord, board_size: usize) -> Point {
    match coord {
        Coord::Pass => PASS_MOVE,
        Coord::Point { row, col } => row * (board_size + 1) + col,
    }
}

/// Format a coordinate as `C4` style notation, or `PASS`.
pub fn format_coord(coord: Coord) -> Result<String, NotationError> {
    match coord {
        Coord::Pass => Ok("PASS".to_string()),
        Coord::Point { row, col } => {
            if !(1..=MAX_SIZE).contains(&row) || !(1..=MAX_SIZE).contains(&col) {
                return Err(NotationError::OutOfRange { row, col });
            }
            Ok(format!("{}{row}", COLUMN_LETTERS[col - 1] as char))
        }
    }
}

/// Format a board point directly, e.g. for move lists.
pub fn format_point(pt: Point, board_size: usize) -> Result<String, NotationError> {
    format_coord(point_to_coord(pt, board_size))
}

/// Parse GTP notation (case-insensitive) into a coordinate on a board of
/// `board_size`.
pub fn parse_coord(s: &str, board_size: usize) -> Result<Coord, NotationError> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&board_size) {
        return Err(NotationError::BoardSizeOutOfRange(board_size));
    }
    let s = s.to_ascii_lowercase();
    if s == "pass" {
        return Ok(Coord::Pass);
    }

    let invalid = || NotationError::InvalidPoint(s.clone());
    let mut chars = s.chars();
    let col_char = chars.next().ok_or_else(invalid)?;
    if !col_char.is_ascii_lowercase() || col_char == 'i' {
        return Err(invalid());
    }
    // Skip 'i' column (Go convention to avoid confusion with 'j')
    let mut col = (col_char as u8 - b'a') as usize;
    if col_char < 'i' {
        col += 1;
    }

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let row: usize = digits.parse().map_err(|_| invalid())?;
    if row < 1 {
        return Err(invalid());
    }

    if col > board_size || row > board_size {
        return Err(NotationError::OffBoard(s));
    }
    Ok(Coord::Point { row, col })
}

/// Parse a GTP color argument.
pub fn parse_color(s: &str) -> Result<Color, NotationError> {
    match s.to_ascii_lowercase().as_str() {
        "b" | "black" => Ok(Color::Black),
        "w" | "white" => Ok(Color::White),
        _ => Err(NotationError::InvalidColor(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(Coord::Point { row: 1, col: 1 }).unwrap(), "A1");
        assert_eq!(format_coord(Coord::Point { row: 4, col: 8 }).unwrap(), "H4");
        // Column 9 is J, not I.
        assert_eq!(format_coord(Coord::Point { row: 9, col: 9 }).unwrap(), "J9");
        assert_eq!(format_coord(Coord::Point { row: 25, col: 25 }).unwrap(), "Z25");
        assert_eq!(format_coord(Coord::Pass).unwrap(), "PASS");
    }

    #[test]
    fn test_format_coord_out_of_range() {
        assert!(matches!(
            format_coord(Coord::Point { row: 26, col: 1 }),
            Err(NotationError::OutOfRange { .. })
        ));
        assert!(matches!(
            format_coord(Coord::Point { row: 1, col: 0 }),
            Err(NotationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("a1", 9), Ok(Coord::Point { row: 1, col: 1 }));
        assert_eq!(parse_coord("J9", 9), Ok(Coord::Point { row: 9, col: 9 }));
        assert_eq!(parse_coord("h8", 9), Ok(Coord::Point { row: 8, col: 8 }));
        assert_eq!(parse_coord("PaSs", 9), Ok(Coord::Pass));
    }

    #[test]
    fn test_parse_coord_rejects_malformed() {
        for bad in ["", "i3", "3a", "a", "a0", "a-1", "a1x", "#4", "é1"] {
            assert!(
                matches!(parse_coord(bad, 9), Err(NotationError::InvalidPoint(_))),
                "{bad:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_parse_coord_off_board() {
        assert_eq!(
            parse_coord("z99", 9),
            Err(NotationError::OffBoard("z99".to_string()))
        );
        assert!(matches!(parse_coord("k1", 9), Err(NotationError::OffBoard(_))));
        assert!(matches!(parse_coord("a10", 9), Err(NotationError::OffBoard(_))));
        assert_eq!(
            parse_coord("a1", 30),
            Err(NotationError::BoardSizeOutOfRange(30))
        );
    }

    #[test]
    fn test_notation_roundtrip() {
        for row in 1..=MAX_SIZE {
            for col in 1..=MAX_SIZE {
                let c = Coord::Point { row, col };
                let s = format_coord(c).unwrap();
                assert_eq!(parse_coord(&s, MAX_SIZE), Ok(c), "failed roundtrip for {s}");
            }
        }
    }

    #[test]
    fn test_point_roundtrip() {
        for size in [2, 7, 9, 25] {
            for row in 1..=size {
                for col in 1..=size {
                    let c = Coord::Point { row, col };
                    let pt = coord_to_point(c, size);
                    assert_eq!(point_to_coord(pt, size), c);
                }
            }
        }
        assert_eq!(point_to_coord(PASS_MOVE, 9), Coord::Pass);
        assert_eq!(coord_to_point(Coord::Pass, 9), PASS_MOVE);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("B"), Ok(Color::Black));
        assert_eq!(parse_color("white"), Ok(Color::White));
        assert!(parse_color("x").is_err());
    }
}
