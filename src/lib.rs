//! Quoridor-Solver: an exhaustive solver for two-player Quoridor.
//!
//! Every position reachable from a starting position is labelled win, lose or
//! tie for the player to move, together with its remoteness (the number of
//! moves until the game ends under optimal play).
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, wall allotments and solver parameters
//! - [`cell`] - Cells, directions and move notation
//! - [`wall`] - Wall geometry, conflicts and wall sets
//! - [`board`] - Movement graph and goal reachability
//! - [`position`] - Game state, legal moves and terminal detection
//! - [`solver`] - Retrograde solver with a memo table
//! - [`store`] - JSON persistence for solved tables
//! - [`render`] - Text rendering of boards and positions
//! - [`playout`] - Random game simulation
//! - [`shell`] - Line-oriented command shell
//!
//! ## Example
//!
//! ```
//! use quoridor_solver::board::Player;
//! use quoridor_solver::cell::Cell;
//! use quoridor_solver::constants::N;
//! use quoridor_solver::position::{Outcome, Position};
//! use quoridor_solver::solver::Solver;
//!
//! // Player one is a single step from home and has the move.
//! let one = Cell::new(1, N as u8 - 1).unwrap();
//! let two = Cell::new(N as u8, N as u8).unwrap();
//! let pos = Position::new(Player::One, [0, 0], [one, two], []).unwrap();
//!
//! let mut solver = Solver::new();
//! let value = solver.solve(&pos).unwrap();
//! assert_eq!(value.outcome, Outcome::Win);
//! assert_eq!(value.remoteness, 1);
//! ```

pub mod board;
pub mod cell;
pub mod constants;
pub mod playout;
pub mod position;
pub mod render;
pub mod shell;
pub mod solver;
pub mod store;
pub mod wall;

pub use position::{Move, Outcome, Position};
pub use solver::{Solver, SolverConfig, Value};
