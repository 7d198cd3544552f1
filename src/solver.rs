//! Exhaustive solver: win/lose/tie plus remoteness for every reachable position.
//!
//! Values follow backward induction from the mover's point of view:
//! - a position with any child labelled `Lose` is a `Win`, remoteness one more
//!   than the quickest such child;
//! - a position whose children are all `Win` is a `Lose`, remoteness one more
//!   than the slowest child;
//! - anything else is a `Tie`.
//!
//! Pawns can step back and forth, so the state graph has cycles and a naive
//! recursive descent would not terminate. A run therefore works in two phases:
//!
//! 1. **Discovery**: walk every position reachable from the root that is not
//!    already in the memo table, recording parent links. Table hits and
//!    primitive positions are leaves.
//! 2. **Propagation**: settle values outward from the leaves in increasing
//!    remoteness order (a priority queue), so the first losing child to reach
//!    a parent is also its quickest, and the last winning child its slowest.
//!    Positions never settled can be kept from losing forever by both sides
//!    and are ties, reported with remoteness 0.
//!
//! The memo table is owned by the [`Solver`] and lives until it is cleared or
//! dropped. A run that hits the position budget stores nothing.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::REPORT_PERIOD;
use crate::position::{Move, Outcome, Position};

/// Solved value of a position for the player to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{outcome} in {remoteness}")]
pub struct Value {
    pub outcome: Outcome,
    /// Moves until the game ends under optimal play.
    pub remoteness: u32,
}

impl Value {
    pub const fn win(remoteness: u32) -> Self {
        Self {
            outcome: Outcome::Win,
            remoteness,
        }
    }

    pub const fn lose(remoteness: u32) -> Self {
        Self {
            outcome: Outcome::Lose,
            remoteness,
        }
    }

    pub const fn tie() -> Self {
        Self {
            outcome: Outcome::Tie,
            remoteness: 0,
        }
    }
}

/// The solver could not produce a definite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SolveError {
    /// The run expanded more positions than the configured budget.
    #[display("unresolved: more than {budget} positions to expand")]
    Unresolved { budget: usize },
}

impl std::error::Error for SolveError {}

/// Runtime limits for a solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum positions to expand in a single [`Solver::solve`] call.
    pub max_positions: Option<usize>,
}

/// Counters accumulated over the solver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Positions whose moves were generated.
    pub expanded: u64,
    /// Lookups answered by the memo table.
    pub cache_hits: u64,
}

/// Memoizing solver.
#[derive(Debug, Default)]
pub struct Solver {
    table: HashMap<Position, Value>,
    config: SolverConfig,
    stats: SolverStats,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    /// Number of solved positions in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Forget every solved position. Counters are kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// The stored value of `position`, without solving.
    pub fn lookup(&self, position: &Position) -> Option<Value> {
        self.table.get(position).copied()
    }

    /// Every solved position and its value, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&Position, Value)> {
        self.table.iter().map(|(position, &value)| (position, value))
    }

    /// Record a value computed elsewhere, e.g. loaded from disk.
    pub(crate) fn insert(&mut self, position: Position, value: Value) {
        self.table.insert(position, value);
    }

    /// Solve `root` and everything reachable from it.
    pub fn solve(&mut self, root: &Position) -> Result<Value, SolveError> {
        if let Some(value) = self.lookup(root) {
            self.stats.cache_hits += 1;
            return Ok(value);
        }

        info!(known = self.table.len(), "solving");
        let mut search = Search::new(&self.table);
        search.intern(root.clone());
        let explored = search.explore(self.config.max_positions, self.stats.expanded);
        self.stats.cache_hits += search.hits;
        self.stats.expanded += search.expanded;
        if let Err(err) = explored {
            warn!(expanded = search.expanded, "{err}");
            return Err(err);
        }

        search.propagate();
        let solved = search.finish();
        let value = solved[0].1;
        let discovered = solved.len();
        self.table.extend(solved);

        info!(
            discovered,
            known = self.table.len(),
            expanded = self.stats.expanded,
            %value,
            "solved"
        );
        Ok(value)
    }

    /// A move that realises the solved value of `position`: the quickest win,
    /// the slowest loss, or a move that keeps a tie. `None` for primitive
    /// positions.
    pub fn best_move(&mut self, position: &Position) -> Result<Option<Move>, SolveError> {
        let value = self.solve(position)?;
        for mv in position.legal_moves() {
            let child = self.solve(&position.child(mv))?;
            let realises = match value.outcome {
                Outcome::Win => {
                    child.outcome == Outcome::Lose && child.remoteness + 1 == value.remoteness
                }
                Outcome::Lose => {
                    child.outcome == Outcome::Win && child.remoteness + 1 == value.remoteness
                }
                Outcome::Tie => child.outcome == Outcome::Tie,
            };
            if realises {
                return Ok(Some(mv));
            }
        }
        Ok(None)
    }
}

/// Solve a single position with a fresh solver.
pub fn solve(position: &Position) -> Result<Value, SolveError> {
    Solver::new().solve(position)
}

/// A discovered position during one solver run.
struct Node {
    position: Position,
    /// Nodes with a move leading here, one entry per move.
    parents: Vec<usize>,
    /// Children not yet known to be wins for their mover.
    pending: u32,
    /// Largest remoteness among children known to be wins.
    slowest: u32,
    value: Option<Value>,
}

/// State of one solver run over the unsolved part of the game graph.
struct Search<'t> {
    known: &'t HashMap<Position, Value>,
    nodes: Vec<Node>,
    index: HashMap<Position, usize>,
    work: Vec<usize>,
    expanded: u64,
    hits: u64,
}

impl<'t> Search<'t> {
    fn new(known: &'t HashMap<Position, Value>) -> Self {
        Self {
            known,
            nodes: Vec::new(),
            index: HashMap::new(),
            work: Vec::new(),
            expanded: 0,
            hits: 0,
        }
    }

    /// Node id for `position`, creating it on first sight. New positions that
    /// are neither memoized nor primitive are queued for expansion.
    fn intern(&mut self, position: Position) -> usize {
        if let Some(&id) = self.index.get(&position) {
            return id;
        }
        let value = match self.known.get(&position) {
            Some(&value) => {
                self.hits += 1;
                Some(value)
            }
            None => position.primitive_value().map(|outcome| Value {
                outcome,
                remoteness: 0,
            }),
        };

        let id = self.nodes.len();
        if value.is_none() {
            self.work.push(id);
        }
        self.index.insert(position.clone(), id);
        self.nodes.push(Node {
            position,
            parents: Vec::new(),
            pending: 0,
            slowest: 0,
            value,
        });
        id
    }

    /// Expand queued positions until none remain.
    fn explore(&mut self, budget: Option<usize>, expanded_before: u64) -> Result<(), SolveError> {
        while let Some(id) = self.work.pop() {
            if let Some(budget) = budget {
                if self.expanded >= budget as u64 {
                    return Err(SolveError::Unresolved { budget });
                }
            }
            self.expanded += 1;
            if (expanded_before + self.expanded) % REPORT_PERIOD == 0 {
                debug!(
                    expanded = self.expanded,
                    discovered = self.nodes.len(),
                    queued = self.work.len(),
                    "exploring"
                );
            }

            let position = self.nodes[id].position.clone();
            for mv in position.legal_moves() {
                let child = self.intern(position.child(mv));
                self.nodes[child].parents.push(id);
                self.nodes[id].pending += 1;
            }
        }
        Ok(())
    }

    /// Settle values from the leaves inward, quickest first.
    fn propagate(&mut self) {
        let mut queue: BinaryHeap<Reverse<(u32, usize)>> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(id, node)| node.value.map(|v| Reverse((v.remoteness, id))))
            .collect();

        while let Some(Reverse((remoteness, id))) = queue.pop() {
            let Some(value) = self.nodes[id].value else {
                continue;
            };
            let parents = std::mem::take(&mut self.nodes[id].parents);
            for parent_id in parents {
                let parent = &mut self.nodes[parent_id];
                if parent.value.is_some() {
                    continue;
                }
                match value.outcome {
                    Outcome::Lose => {
                        parent.value = Some(Value::win(remoteness + 1));
                        queue.push(Reverse((remoteness + 1, parent_id)));
                    }
                    Outcome::Win => {
                        parent.pending -= 1;
                        parent.slowest = parent.slowest.max(remoteness);
                        if parent.pending == 0 {
                            let settled = parent.slowest + 1;
                            parent.value = Some(Value::lose(settled));
                            queue.push(Reverse((settled, parent_id)));
                        }
                    }
                    Outcome::Tie => {}
                }
            }
        }
    }

    /// Final values, root first. Unsettled positions are ties.
    fn finish(self) -> Vec<(Position, Value)> {
        self.nodes
            .into_iter()
            .map(|node| (node.position, node.value.unwrap_or_else(Value::tie)))
            .collect()
    }
}
