//! The movement graph: which cells a pawn can step between, and where the
//! pawns stand.
//!
//! Each cell keeps a 4-bit mask of open directions. Walls only ever clear bits,
//! always in pairs (`a -> b` and `b -> a`), so the graph stays a symmetric
//! subgraph of the full grid. Every update returns a new board and leaves the
//! receiver untouched.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Direction};
use crate::constants::{CELLS, MID, N};
use crate::wall::Wall;

/// One of the two players. Player one moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    #[inline]
    pub const fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The row this player's pawn must reach.
    #[inline]
    pub const fn goal_row(self) -> u8 {
        match self {
            Player::One => N as u8,
            Player::Two => 1,
        }
    }

    /// The row this player's pawn starts on.
    #[inline]
    pub const fn home_row(self) -> u8 {
        self.other().goal_row()
    }

    /// Midpoint of the home row.
    pub const fn start_cell(self) -> Cell {
        Cell::at(MID, self.home_row())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

/// Node index of a player's goal sentinel in the reachability search.
#[inline]
const fn sentinel(player: Player) -> usize {
    CELLS + player.index()
}

/// Adjacency over the cells plus both pawn positions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    /// Open-direction mask per cell, indexed by [`Cell::index`].
    open: [u8; CELLS],
    pawns: [Cell; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The full grid graph with both pawns on their start cells.
    pub fn new() -> Self {
        Self::with_pawns([Player::One.start_cell(), Player::Two.start_cell()])
    }

    /// The full grid graph with pawns on the given cells.
    pub fn with_pawns(pawns: [Cell; 2]) -> Self {
        let mut open = [0u8; CELLS];
        for cell in Cell::all() {
            for dir in Direction::ALL {
                if cell.step(dir).is_some() {
                    open[cell.index()] |= dir.bit();
                }
            }
        }
        Self { open, pawns }
    }

    #[inline]
    pub fn pawn(&self, player: Player) -> Cell {
        self.pawns[player.index()]
    }

    #[inline]
    pub fn pawns(&self) -> [Cell; 2] {
        self.pawns
    }

    /// Whether the edge leaving `cell` in `dir` exists and is not walled off.
    #[inline]
    pub fn is_open(&self, cell: Cell, dir: Direction) -> bool {
        self.open[cell.index()] & dir.bit() != 0
    }

    /// The cell reached by stepping from `cell` in `dir`, if that edge is open.
    #[inline]
    pub fn neighbor(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        if self.is_open(cell, dir) {
            cell.step(dir)
        } else {
            None
        }
    }

    /// Cells directly reachable from `cell`, in north/east/south/west order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(cell, dir))
    }

    pub fn has_edge(&self, a: Cell, b: Cell) -> bool {
        a.direction_to(b).is_some_and(|dir| self.is_open(a, dir))
    }

    /// Number of directed edges still present.
    pub fn edge_count(&self) -> usize {
        self.open.iter().map(|mask| mask.count_ones() as usize).sum()
    }

    fn sever(&mut self, a: Cell, b: Cell) {
        if let Some(dir) = a.direction_to(b) {
            self.open[a.index()] &= !dir.bit();
            self.open[b.index()] &= !dir.opposite().bit();
        }
    }

    /// A new board with the two edges cut by `wall` removed in both directions.
    pub fn apply_wall(&self, wall: Wall) -> Board {
        let mut board = self.clone();
        for (a, b) in wall.edges_severed() {
            board.sever(a, b);
        }
        board
    }

    /// A new board with `player`'s pawn on `destination`. The graph is unchanged.
    pub fn move_pawn(&self, player: Player, destination: Cell) -> Board {
        let mut board = self.clone();
        board.pawns[player.index()] = destination;
        board
    }

    /// Whether both pawns can still reach their goal rows.
    ///
    /// The search runs over the cell graph extended with one sentinel node per
    /// player. Every cell on a player's goal row has a directed edge into that
    /// player's sentinel, and sentinels have no outgoing edges, so reaching the
    /// sentinel is the same as reaching any goal cell. Pawns do not block paths.
    pub fn is_globally_valid(&self) -> bool {
        Player::BOTH
            .into_iter()
            .all(|player| self.reaches(self.pawn(player), sentinel(player)))
    }

    /// Whether `player`'s pawn can reach its goal row.
    pub fn reaches_goal(&self, player: Player) -> bool {
        self.reaches(self.pawn(player), sentinel(player))
    }

    /// Successors of a node in the sentinel-extended graph.
    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        let cell = (node < CELLS).then(|| Cell::from_index(node));
        let steps = cell
            .into_iter()
            .flat_map(move |cell| self.neighbors(cell).map(Cell::index));
        let sentinels = cell.into_iter().flat_map(|cell| {
            Player::BOTH
                .into_iter()
                .filter(move |player| cell.y() == player.goal_row())
                .map(sentinel)
        });
        steps.chain(sentinels)
    }

    /// Breadth-first search from `start` to node `target`.
    fn reaches(&self, start: Cell, target: usize) -> bool {
        let mut visited = [false; CELLS + 2];
        let mut queue = VecDeque::with_capacity(CELLS);
        visited[start.index()] = true;
        queue.push_back(start.index());

        while let Some(node) = queue.pop_front() {
            if node == target {
                return true;
            }
            for next in self.successors(node) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }
}
