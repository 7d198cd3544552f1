//! Saving and loading the solver's memo table as JSON.
//!
//! Each entry pairs a canonical position encoding with its value. Cells and
//! walls are written in move notation and placed walls are sorted, so a given
//! table always serializes to the same document. Loading rebuilds every
//! position through [`Position::new`], so a tampered file cannot smuggle in an
//! impossible position.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Player;
use crate::cell::{Cell, ParseError};
use crate::constants::N;
use crate::position::{Position, PositionError};
use crate::solver::{Solver, Value};
use crate::wall::Wall;

#[derive(Debug, Display, Error, From)]
pub enum StoreError {
    #[display("i/o error: {_0}")]
    Io(#[error(source)] std::io::Error),
    #[display("malformed table: {_0}")]
    Json(#[error(source)] serde_json::Error),
    #[display("table was written for a {found}x{found} board")]
    #[from(ignore)]
    BoardSize { found: usize },
    #[display("bad notation in table: {_0}")]
    Notation(#[error(source)] ParseError),
    #[display("impossible position in table: {_0}")]
    Position(#[error(source)] PositionError),
}

/// Canonical, human-readable encoding of a position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionKey {
    pub turn: Player,
    pub walls_left: [u8; 2],
    pub pawns: [String; 2],
    pub placed: Vec<String>,
}

impl From<&Position> for PositionKey {
    fn from(position: &Position) -> Self {
        Self {
            turn: position.turn(),
            walls_left: Player::BOTH.map(|player| position.walls_left(player)),
            pawns: Player::BOTH.map(|player| position.pawn(player).to_string()),
            placed: position
                .placed_walls()
                .iter()
                .map(|wall| wall.to_string())
                .collect(),
        }
    }
}

impl PositionKey {
    pub fn to_position(&self) -> Result<Position, StoreError> {
        let pawns = [self.pawns[0].parse::<Cell>()?, self.pawns[1].parse::<Cell>()?];
        let placed = self
            .placed
            .iter()
            .map(|text| text.parse::<Wall>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Position::new(self.turn, self.walls_left, pawns, placed)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    position: PositionKey,
    value: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    board_size: usize,
    entries: Vec<Entry>,
}

/// Write every solved position in `solver` to `writer`.
pub fn save<W: Write>(solver: &Solver, writer: W) -> Result<(), StoreError> {
    let mut entries: Vec<Entry> = solver
        .entries()
        .map(|(position, value)| Entry {
            position: position.into(),
            value,
        })
        .collect();
    entries.sort_by(|a, b| a.position.cmp(&b.position));

    let document = Document {
        board_size: N,
        entries,
    };
    serde_json::to_writer(writer, &document)?;
    Ok(())
}

/// Read a table from `reader` into `solver`, returning how many entries it held.
pub fn load_into<R: Read>(solver: &mut Solver, reader: R) -> Result<usize, StoreError> {
    let document: Document = serde_json::from_reader(reader)?;
    if document.board_size != N {
        return Err(StoreError::BoardSize {
            found: document.board_size,
        });
    }
    let count = document.entries.len();
    for entry in document.entries {
        solver.insert(entry.position.to_position()?, entry.value);
    }
    Ok(count)
}

/// Read a table into a fresh solver with default limits.
pub fn load<R: Read>(reader: R) -> Result<Solver, StoreError> {
    let mut solver = Solver::new();
    load_into(&mut solver, reader)?;
    Ok(solver)
}

pub fn save_file(solver: &Solver, path: &Path) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    save(solver, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), entries = solver.len(), "saved table");
    Ok(())
}

pub fn load_file(solver: &mut Solver, path: &Path) -> Result<usize, StoreError> {
    let count = load_into(solver, BufReader::new(File::open(path)?))?;
    info!(path = %path.display(), entries = count, "loaded table");
    Ok(count)
}
