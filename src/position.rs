//! Game state and move generation.
//!
//! A [`Position`] is the complete state of a game: whose turn it is, how many
//! walls each player still holds, the movement graph with both pawns, and the
//! set of walls already on the board. Positions are immutable values. Applying
//! a move returns a fresh position, so a parent stays valid while the solver
//! explores its children.
//!
//! ## Pawn moves
//!
//! A pawn steps to any open neighbour except the cell holding the other pawn.
//! When the other pawn is adjacent, the mover may jump:
//! - straight over it, if the cell behind it exists and is not walled off;
//! - otherwise diagonally to either side of it, wherever the side edge from the
//!   other pawn's cell is open. Both open diagonals are offered as separate moves.
//!
//! ## Wall moves
//!
//! Offered only while the mover has walls left. A wall must not be on the board
//! already, must not cross or overlap a placed wall, and must leave both pawns a
//! path to their goal rows.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Player};
use crate::cell::{Cell, Direction, ParseError};
use crate::constants::START_WALLS;
use crate::wall::{Wall, WallSet};

/// Game-theoretic outcome from the perspective of the player to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[display("win")]
    Win,
    #[display("lose")]
    Lose,
    #[display("tie")]
    Tie,
}

/// A single move: relocate the mover's pawn, or place one wall.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Pawn(Cell),
    Wall(Wall),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pawn(cell) => write!(f, "{cell}"),
            Move::Wall(wall) => write!(f, "{wall}"),
        }
    }
}

impl FromStr for Move {
    type Err = ParseError;

    /// `e2` is a pawn move, `c3h` / `c3v` a wall placement.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.ends_with(|c: char| c.is_ascii_alphabetic()) {
            Ok(Move::Wall(s.parse()?))
        } else {
            Ok(Move::Pawn(s.parse()?))
        }
    }
}

/// A requested move that is not legal in the position. The position is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveError {
    #[display("game is already over")]
    GameOver,
    #[display("pawn cannot move to {to}")]
    IllegalPawnMove { to: Cell },
    #[display("no walls left")]
    NoWallsLeft,
    #[display("wall {wall} is already placed")]
    WallTaken { wall: Wall },
    #[display("wall {wall} crosses or overlaps a placed wall")]
    WallCrosses { wall: Wall },
    #[display("wall {wall} would cut a pawn off from its goal")]
    WallBlocksPath { wall: Wall },
}

impl std::error::Error for MoveError {}

/// A position that could never arise in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PositionError {
    #[display("both pawns on {cell}")]
    OverlappingPawns { cell: Cell },
    #[display("player {player} holds {walls} walls, more than the allotment")]
    TooManyWalls { player: Player, walls: u8 },
    #[display("{placed} walls placed and {held} held exceed both allotments together")]
    WallsOverAllotment { placed: usize, held: usize },
    #[display("both pawns stand on their goal rows")]
    BothHome,
    #[display("wall {wall} listed twice")]
    DuplicateWall { wall: Wall },
    #[display("walls {first} and {second} cannot coexist")]
    ConflictingWalls { first: Wall, second: Wall },
    #[display("a pawn has no path to its goal row")]
    Disconnected,
}

impl std::error::Error for PositionError {}

/// Complete game state.
///
/// Equality and hashing cover exactly the memo key: turn, wall counts, pawn
/// cells, and placed walls. The movement graph is a function of the placed
/// walls, so it is left out.
#[derive(Clone, Debug)]
pub struct Position {
    turn: Player,
    walls_left: [u8; 2],
    board: Board,
    placed: WallSet,
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.turn == other.turn
            && self.walls_left == other.walls_left
            && self.board.pawns() == other.board.pawns()
            && self.placed == other.placed
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.turn.hash(state);
        self.walls_left.hash(state);
        self.board.pawns().hash(state);
        self.placed.hash(state);
    }
}

impl Position {
    /// The start of a game: pawns on their home midpoints, full allotments,
    /// no walls placed, player one to move.
    pub fn start() -> Self {
        Self {
            turn: Player::One,
            walls_left: [START_WALLS; 2],
            board: Board::new(),
            placed: WallSet::new(),
        }
    }

    /// Build an arbitrary position, checking that it could occur in play.
    pub fn new(
        turn: Player,
        walls_left: [u8; 2],
        pawns: [Cell; 2],
        placed: impl IntoIterator<Item = Wall>,
    ) -> Result<Self, PositionError> {
        if pawns[0] == pawns[1] {
            return Err(PositionError::OverlappingPawns { cell: pawns[0] });
        }
        if Player::BOTH
            .into_iter()
            .all(|player| pawns[player.index()].y() == player.goal_row())
        {
            return Err(PositionError::BothHome);
        }
        for player in Player::BOTH {
            let walls = walls_left[player.index()];
            if walls > START_WALLS {
                return Err(PositionError::TooManyWalls { player, walls });
            }
        }

        let mut board = Board::with_pawns(pawns);
        let mut set = WallSet::new();
        for wall in placed {
            if set.contains(wall) {
                return Err(PositionError::DuplicateWall { wall });
            }
            if let Some(first) = set.iter().find(|&w| wall.conflicts_with().contains(w)) {
                return Err(PositionError::ConflictingWalls {
                    first,
                    second: wall,
                });
            }
            set.insert(wall);
            board = board.apply_wall(wall);
        }
        // Every placed wall came out of one of the two allotments.
        let held = walls_left.iter().map(|&w| w as usize).sum::<usize>();
        if set.len() + held > 2 * START_WALLS as usize {
            return Err(PositionError::WallsOverAllotment {
                placed: set.len(),
                held,
            });
        }
        if !board.is_globally_valid() {
            return Err(PositionError::Disconnected);
        }

        Ok(Self {
            turn,
            walls_left,
            board,
            placed: set,
        })
    }

    /// The player to move.
    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    #[inline]
    pub fn walls_left(&self, player: Player) -> u8 {
        self.walls_left[player.index()]
    }

    #[inline]
    pub fn pawn(&self, player: Player) -> Cell {
        self.board.pawn(player)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn placed_walls(&self) -> WallSet {
        self.placed
    }

    /// Walls not yet on the board. Some may still be illegal to place.
    #[inline]
    pub fn available_walls(&self) -> WallSet {
        self.placed.complement()
    }

    /// The player whose pawn stands on its goal row, if any.
    pub fn winner(&self) -> Option<Player> {
        Player::BOTH
            .into_iter()
            .find(|&player| self.pawn(player).y() == player.goal_row())
    }

    /// Value of a terminal position for the player to move, or `None` if play
    /// continues. The mover wins if their own pawn is home and loses if the
    /// opponent's is.
    pub fn primitive_value(&self) -> Option<Outcome> {
        self.winner().map(|winner| {
            if winner == self.turn {
                Outcome::Win
            } else {
                Outcome::Lose
            }
        })
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.winner().is_some()
    }

    /// Destinations for the mover's pawn, including jumps over the other pawn.
    pub fn pawn_moves(&self) -> Vec<Cell> {
        if self.is_primitive() {
            return Vec::new();
        }
        let me = self.pawn(self.turn);
        let them = self.pawn(self.turn.other());
        let mut moves = Vec::with_capacity(5);

        for dir in Direction::ALL {
            let Some(next) = self.board.neighbor(me, dir) else {
                continue;
            };
            if next != them {
                moves.push(next);
            } else if let Some(behind) = self.board.neighbor(them, dir) {
                moves.push(behind);
            } else {
                moves.extend(
                    dir.perpendicular()
                        .into_iter()
                        .filter_map(|side| self.board.neighbor(them, side)),
                );
            }
        }
        moves
    }

    /// Check that the mover may place `wall` here.
    pub fn check_wall(&self, wall: Wall) -> Result<(), MoveError> {
        if self.walls_left(self.turn) == 0 {
            return Err(MoveError::NoWallsLeft);
        }
        if self.placed.contains(wall) {
            return Err(MoveError::WallTaken { wall });
        }
        if self.placed.intersects(wall.conflicts_with()) {
            return Err(MoveError::WallCrosses { wall });
        }
        if !self.board.apply_wall(wall).is_globally_valid() {
            return Err(MoveError::WallBlocksPath { wall });
        }
        Ok(())
    }

    /// Walls the mover may place, in universe order.
    pub fn wall_moves(&self) -> Vec<Wall> {
        if self.is_primitive() || self.walls_left(self.turn) == 0 {
            return Vec::new();
        }
        self.available_walls()
            .iter()
            .filter(|&wall| self.check_wall(wall).is_ok())
            .collect()
    }

    /// All legal moves: pawn moves first, then wall placements. Empty exactly
    /// when the position is primitive.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = self.pawn_moves().into_iter().map(Move::Pawn).collect();
        moves.extend(self.wall_moves().into_iter().map(Move::Wall));
        moves
    }

    /// Apply `mv` if it is legal, returning the successor position.
    pub fn apply(&self, mv: Move) -> Result<Position, MoveError> {
        if self.is_primitive() {
            return Err(MoveError::GameOver);
        }
        match mv {
            Move::Pawn(to) => {
                if !self.pawn_moves().contains(&to) {
                    return Err(MoveError::IllegalPawnMove { to });
                }
            }
            Move::Wall(wall) => self.check_wall(wall)?,
        }
        Ok(self.child(mv))
    }

    /// Successor for a move already known to be legal.
    pub(crate) fn child(&self, mv: Move) -> Position {
        let mover = self.turn;
        match mv {
            Move::Pawn(to) => Position {
                turn: mover.other(),
                board: self.board.move_pawn(mover, to),
                ..self.clone()
            },
            Move::Wall(wall) => {
                let mut walls_left = self.walls_left;
                debug_assert!(walls_left[mover.index()] > 0, "{mover} has no walls");
                walls_left[mover.index()] -= 1;
                let mut placed = self.placed;
                placed.insert(wall);
                let board = self.board.apply_wall(wall);
                debug_assert!(board.is_globally_valid(), "wall {wall} disconnects a pawn");
                Position {
                    turn: mover.other(),
                    walls_left,
                    board,
                    placed,
                }
            }
        }
    }
}
