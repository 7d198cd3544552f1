//! Wall placements and their geometry.
//!
//! A wall is named by its lower corner `(x, y)`; its upper corner is always
//! `(x + 1, y + 1)`. Both corners are cells, so the wall lies on the grid lines
//! between those cells and spans two unit edges:
//!
//! - a [`Orientation::Horizontal`] wall lies between rows `y` and `y + 1`,
//!   covering columns `x` and `x + 1`, and blocks north/south movement;
//! - a [`Orientation::Vertical`] wall lies between columns `x` and `x + 1`,
//!   covering rows `y` and `y + 1`, and blocks east/west movement.
//!
//! Walls never sit on the outer border, so `1 <= x, y <= N - 1`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use derive_more::Display;

use crate::cell::{Cell, ParseError};
use crate::constants::{WALL_COUNT, WALL_SPAN};

/// An edge between two orthogonally adjacent cells.
pub type Edge = (Cell, Cell);

/// Invalid wall construction. Never a question of move legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WallError {
    /// Lower corner outside `1..=N-1` on some axis.
    #[display("wall corner ({x}, {y}) is not an interior intersection")]
    OutOfRange { x: u8, y: u8 },
    /// Upper corner is not the diagonal neighbour of the lower corner.
    #[display("wall corners {lower:?} and {upper:?} are not diagonal neighbours")]
    NotAdjacent { lower: (u8, u8), upper: (u8, u8) },
    /// Orientation tag other than `h` or `v`.
    #[display("unknown wall orientation {tag:?}")]
    UnknownOrientation { tag: char },
}

impl std::error::Error for WallError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const fn other(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub const fn tag(self) -> char {
        match self {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        }
    }

    pub fn from_tag(tag: char) -> Result<Self, WallError> {
        match tag.to_ascii_lowercase() {
            'h' => Ok(Orientation::Horizontal),
            'v' => Ok(Orientation::Vertical),
            _ => Err(WallError::UnknownOrientation { tag }),
        }
    }
}

/// A wall placement. Pure value; equality is structural.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Wall {
    x: u8,
    y: u8,
    orientation: Orientation,
}

impl Wall {
    /// Create a wall from its lower corner.
    pub fn new(x: u8, y: u8, orientation: Orientation) -> Result<Self, WallError> {
        let span = 1..=WALL_SPAN as u8;
        if span.contains(&x) && span.contains(&y) {
            Ok(Self { x, y, orientation })
        } else {
            Err(WallError::OutOfRange { x, y })
        }
    }

    /// Create a wall from both corners, checking they are diagonal neighbours.
    pub fn from_corners(
        lower: (u8, u8),
        upper: (u8, u8),
        orientation: Orientation,
    ) -> Result<Self, WallError> {
        if upper.0 != lower.0.wrapping_add(1) || upper.1 != lower.1.wrapping_add(1) {
            return Err(WallError::NotAdjacent { lower, upper });
        }
        Self::new(lower.0, lower.1, orientation)
    }

    /// Every placement on the board, enumerated once.
    pub fn all() -> &'static [Wall] {
        static ALL: OnceLock<Vec<Wall>> = OnceLock::new();
        ALL.get_or_init(|| (0..WALL_COUNT).map(Wall::from_index).collect())
    }

    #[inline]
    pub fn orientation(self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn lower_corner(self) -> Cell {
        Cell::at(self.x, self.y)
    }

    #[inline]
    pub fn upper_corner(self) -> Cell {
        Cell::at(self.x + 1, self.y + 1)
    }

    /// Dense index in `0..WALL_COUNT`.
    #[inline]
    pub fn index(self) -> usize {
        let corner = (self.y as usize - 1) * WALL_SPAN + (self.x as usize - 1);
        corner * 2 + self.orientation as usize
    }

    /// Inverse of [`Wall::index`].
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < WALL_COUNT);
        let corner = index / 2;
        let orientation = if index % 2 == 0 {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        Self {
            x: (corner % WALL_SPAN) as u8 + 1,
            y: (corner / WALL_SPAN) as u8 + 1,
            orientation,
        }
    }

    /// The two unit edges this wall cuts.
    pub fn edges_severed(self) -> [Edge; 2] {
        let (x, y) = (self.x, self.y);
        match self.orientation {
            Orientation::Horizontal => [
                (Cell::at(x, y), Cell::at(x, y + 1)),
                (Cell::at(x + 1, y + 1), Cell::at(x + 1, y)),
            ],
            Orientation::Vertical => [
                (Cell::at(x, y), Cell::at(x + 1, y)),
                (Cell::at(x + 1, y + 1), Cell::at(x, y + 1)),
            ],
        }
    }

    /// Placements that cannot coexist with this one: the perpendicular wall on
    /// the same intersection, and the parallel walls shifted one unit along this
    /// wall's length (they would share a unit edge).
    pub fn conflicts_with(self) -> WallSet {
        let mut set = WallSet::new();
        set.insert(Wall {
            orientation: self.orientation.other(),
            ..self
        });
        let shifted: [(i16, i16); 2] = match self.orientation {
            Orientation::Horizontal => [(-1, 0), (1, 0)],
            Orientation::Vertical => [(0, -1), (0, 1)],
        };
        for (dx, dy) in shifted {
            let x = self.x as i16 + dx;
            let y = self.y as i16 + dy;
            if let (Ok(x), Ok(y)) = (u8::try_from(x), u8::try_from(y)) {
                if let Ok(wall) = Wall::new(x, y, self.orientation) {
                    set.insert(wall);
                }
            }
        }
        set
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.lower_corner(), self.orientation.tag())
    }
}

impl FromStr for Wall {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let tag = s
            .chars()
            .last()
            .ok_or_else(|| ParseError::Malformed(s.to_string()))?;
        let corner: Cell = s[..s.len() - tag.len_utf8()].parse()?;
        let orientation = Orientation::from_tag(tag)?;
        Ok(Wall::new(corner.x(), corner.y(), orientation)?)
    }
}

/// A set of walls, stored as a bitset over [`Wall::index`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WallSet(u128);

impl WallSet {
    const FULL: u128 = u128::MAX >> (128 - WALL_COUNT);

    pub const fn new() -> Self {
        Self(0)
    }

    /// The whole wall universe.
    pub const fn full() -> Self {
        Self(Self::FULL)
    }

    #[inline]
    pub fn contains(self, wall: Wall) -> bool {
        self.0 & (1u128 << wall.index()) != 0
    }

    /// Returns `true` if the wall was not already present.
    #[inline]
    pub fn insert(&mut self, wall: Wall) -> bool {
        let fresh = !self.contains(wall);
        self.0 |= 1u128 << wall.index();
        fresh
    }

    #[inline]
    pub fn intersects(self, other: WallSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Walls of the universe not in this set.
    #[inline]
    pub fn complement(self) -> WallSet {
        WallSet(!self.0 & Self::FULL)
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate in index order.
    pub fn iter(self) -> impl Iterator<Item = Wall> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Wall::from_index(index))
        })
    }
}

impl FromIterator<Wall> for WallSet {
    fn from_iter<I: IntoIterator<Item = Wall>>(iter: I) -> Self {
        let mut set = WallSet::new();
        for wall in iter {
            set.insert(wall);
        }
        set
    }
}
