//! Text rendering of boards and positions.
//!
//! Rows are drawn from row `N` at the top down to row 1. Pawns show as `1` and
//! `2`, empty cells as `.`. A `|` between two cells and a `-` under a cell mark
//! walled-off edges. Rendering only borrows; it cannot change a position.

use std::fmt;

use crate::board::{Board, Player};
use crate::cell::Cell;
use crate::constants::N;
use crate::position::Position;

fn cell_char(board: &Board, cell: Cell) -> char {
    if board.pawn(Player::One) == cell {
        '1'
    } else if board.pawn(Player::Two) == cell {
        '2'
    } else {
        '.'
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (1..=N as u8).rev() {
            write!(f, "{y} ")?;
            for x in 1..=N as u8 {
                let here = Cell::at(x, y);
                write!(f, "{}", cell_char(self, here))?;
                if x < N as u8 {
                    let east = Cell::at(x + 1, y);
                    let gap = if self.has_edge(here, east) { ' ' } else { '|' };
                    write!(f, "{gap}")?;
                }
            }
            writeln!(f)?;

            if y > 1 {
                write!(f, "  ")?;
                for x in 1..=N as u8 {
                    let cut = |x: u8| !self.has_edge(Cell::at(x, y), Cell::at(x, y - 1));
                    write!(f, "{}", if cut(x) { '-' } else { ' ' })?;
                    if x < N as u8 {
                        let joined = cut(x) && cut(x + 1);
                        write!(f, "{}", if joined { '-' } else { ' ' })?;
                    }
                }
                writeln!(f)?;
            }
        }

        write!(f, "  ")?;
        for x in 0..N as u8 {
            write!(f, "{} ", (b'a' + x) as char)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board())?;
        writeln!(f, "player {} to move", self.turn())?;
        for player in Player::BOTH {
            writeln!(f, "walls left for player {player}: {}", self.walls_left(player))?;
        }
        Ok(())
    }
}
