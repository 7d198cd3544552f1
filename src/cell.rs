//! Board coordinates and compass directions.
//!
//! A [`Cell`] is a 1-based `(x, y)` pair. Its text notation is the column letter
//! followed by the row number, so the start cell of player one on a 9x9 board
//! is `e1` and the far corner is `i9`.

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, From};

use crate::constants::{CELLS, N};
use crate::wall::WallError;

/// A coordinate outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("cell ({x}, {y}) is off the board")]
pub struct CellError {
    pub x: u8,
    pub y: u8,
}

impl std::error::Error for CellError {}

/// Failure to read cell, wall, or move notation.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum ParseError {
    /// Text does not have the shape of any notation.
    #[display("malformed notation {_0:?}")]
    #[from(ignore)]
    Malformed(String),
    /// Well-formed, but names a cell off the board.
    #[display("{_0}")]
    Cell(CellError),
    /// Well-formed, but names an impossible wall.
    #[display("{_0}")]
    Wall(WallError),
}

impl std::error::Error for ParseError {}

/// One of the four orthogonal directions a pawn can step in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row `N`.
    North,
    /// Towards column `N`.
    East,
    /// Towards row 1.
    South,
    /// Towards column 1.
    West,
}

impl Direction {
    /// All directions, in move generation order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Bit used for this direction in a cell's open-edge mask.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::East => 2,
            Direction::South => 4,
            Direction::West => 8,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The two directions at right angles to this one.
    pub const fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }

    const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }
}

/// A square a pawn may occupy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    x: u8,
    y: u8,
}

impl Cell {
    /// Create a cell, rejecting coordinates outside `1..=N`.
    pub fn new(x: u8, y: u8) -> Result<Self, CellError> {
        if Self::on_board(x as i16, y as i16) {
            Ok(Self { x, y })
        } else {
            Err(CellError { x, y })
        }
    }

    /// Internal constructor for coordinates already known to be on the board.
    pub(crate) const fn at(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    #[inline]
    fn on_board(x: i16, y: i16) -> bool {
        (1..=N as i16).contains(&x) && (1..=N as i16).contains(&y)
    }

    #[inline]
    pub fn x(self) -> u8 {
        self.x
    }

    #[inline]
    pub fn y(self) -> u8 {
        self.y
    }

    /// Dense index in `0..CELLS`, row-major from `(1, 1)`.
    #[inline]
    pub fn index(self) -> usize {
        (self.y as usize - 1) * N + (self.x as usize - 1)
    }

    /// Inverse of [`Cell::index`].
    #[inline]
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < CELLS);
        Self::at((index % N) as u8 + 1, (index / N) as u8 + 1)
    }

    /// The adjacent cell in `dir`, or `None` past the border.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        Self::on_board(x, y).then(|| Self::at(x as u8, y as u8))
    }

    /// Direction from `self` to an orthogonally adjacent `other`.
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.step(dir) == Some(other))
    }

    /// Iterate over every cell in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELLS).map(Cell::from_index)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.x - 1) as char, self.y)
    }
}

impl FromStr for Cell {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let mut chars = s.chars();
        let column = chars
            .next()
            .filter(char::is_ascii_lowercase)
            .ok_or_else(|| ParseError::Malformed(s.clone()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::Malformed(s.clone()));
        }
        let row: u8 = digits
            .parse()
            .map_err(|_| ParseError::Malformed(s.clone()))?;
        let x = column as u8 - b'a' + 1;
        Ok(Cell::new(x, row)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for cell in Cell::all() {
            assert_eq!(Cell::from_index(cell.index()), cell);
        }
    }

    #[test]
    fn test_new_rejects_off_board() {
        assert!(Cell::new(0, 1).is_err());
        assert!(Cell::new(1, N as u8 + 1).is_err());
        assert!(Cell::new(N as u8, N as u8).is_ok());
    }

    #[test]
    fn test_step_stops_at_border() {
        let corner = Cell::new(1, 1).unwrap();
        assert_eq!(corner.step(Direction::South), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::North), Some(Cell::new(1, 2).unwrap()));
        assert_eq!(corner.step(Direction::East), Some(Cell::new(2, 1).unwrap()));
    }

    #[test]
    fn test_notation() {
        let cell: Cell = "c2".parse().unwrap();
        assert_eq!((cell.x(), cell.y()), (3, 2));
        assert_eq!(cell.to_string(), "c2");
        assert!("2c".parse::<Cell>().is_err());
        assert!("".parse::<Cell>().is_err());
        assert!(matches!("z1".parse::<Cell>(), Err(ParseError::Cell(_))));
    }

    #[test]
    fn test_notation_rejects_signed_rows() {
        assert!(matches!("a+1".parse::<Cell>(), Err(ParseError::Malformed(_))));
        assert!(matches!("a-1".parse::<Cell>(), Err(ParseError::Malformed(_))));
        assert!(matches!("a 1".parse::<Cell>(), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_perpendicular() {
        for dir in Direction::ALL {
            for perp in dir.perpendicular() {
                assert_ne!(perp, dir);
                assert_ne!(perp, dir.opposite());
            }
        }
    }
}
