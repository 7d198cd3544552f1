//! Constants for board dimensions, wall allotments, and solver parameters.
//!
//! Cells are addressed by 1-based `(x, y)` coordinates where `x` is the column
//! and `y` is the row. Player one starts on row 1 and races to row `N`; player
//! two starts on row `N` and races to row 1.
//!
//! # Board Size Configuration
//!
//! The board size is controlled by Cargo features:
//! - `board9x9` (default): the standard 9x9 board with 10 walls per player
//! - `board5x5`: a 5x5 board with 3 walls per player, small enough to solve
//!
//! To compile for a specific board size:
//! ```sh
//! cargo build                                            # 9x9 (default)
//! cargo build --no-default-features --features board5x5  # 5x5
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Must be odd so each pawn starts on a midpoint.
#[cfg(feature = "board9x9")]
pub const N: usize = 9;

#[cfg(feature = "board5x5")]
pub const N: usize = 5;

// Compile-time check: exactly one board size feature must be enabled
#[cfg(all(feature = "board9x9", feature = "board5x5"))]
compile_error!("Cannot enable both 'board9x9' and 'board5x5' features at the same time");

#[cfg(not(any(feature = "board9x9", feature = "board5x5")))]
compile_error!("Must enable exactly one board size feature: 'board9x9' or 'board5x5'");

/// Number of cells on the board.
pub const CELLS: usize = N * N;

/// Column (and row) of the midpoint of a home row.
pub const MID: u8 = (N / 2 + 1) as u8;

/// Number of wall corner positions along each axis (walls never sit on the border).
pub const WALL_SPAN: usize = N - 1;

/// Size of the wall universe: every corner position in both orientations.
pub const WALL_COUNT: usize = WALL_SPAN * WALL_SPAN * 2;

// `WallSet` is a single u128 bitset.
const _: () = assert!(WALL_COUNT <= 128);

// =============================================================================
// Game Parameters
// =============================================================================

/// Walls each player may place over the whole game.
#[cfg(feature = "board9x9")]
pub const START_WALLS: u8 = 10;

#[cfg(feature = "board5x5")]
pub const START_WALLS: u8 = 3;

// =============================================================================
// Solver and Playout Parameters
// =============================================================================

/// Number of expanded positions between solver progress reports.
pub const REPORT_PERIOD: u64 = 100_000;

/// Default ply cap for random playouts (pawns may wander back and forth forever).
pub const DEFAULT_MAX_PLIES: usize = CELLS * 4;
