//! Solver properties checked against whole solved tables.
//!
//! Wall-free races keep the state space small on every board size. Open
//! wall play is only solved on the 5x5 board; on larger boards walls are
//! solved inside fenced corridors.

use quoridor_solver::board::Player;
use quoridor_solver::cell::Cell;
use quoridor_solver::constants::N;
use quoridor_solver::position::{Move, Outcome, Position};
use quoridor_solver::solver::{self, SolveError, Solver, SolverConfig, Value};
use quoridor_solver::store::{self, PositionKey};
use quoridor_solver::wall::{Orientation, Wall};

fn cell(x: u8, y: u8) -> Cell {
    Cell::new(x, y).unwrap()
}

fn race(turn: Player, p1: Cell, p2: Cell) -> Position {
    Position::new(turn, [0, 0], [p1, p2], []).unwrap()
}

/// Vertical walls along column line `x` at each of the rows `ys`.
fn fence(x: u8, ys: impl Iterator<Item = u8>) -> impl Iterator<Item = Wall> {
    ys.map(move |y| Wall::new(x, y, Orientation::Vertical).unwrap())
}

/// A race in which both pawns share a column and must pass each other.
fn head_on() -> Position {
    race(Player::One, cell(2, 2), cell(2, N as u8 - 1))
}

/// Check every table entry against the values of its children.
fn assert_backward_induction(solver: &Solver) {
    for (pos, value) in solver.entries() {
        if let Some(outcome) = pos.primitive_value() {
            assert_eq!(value, Value { outcome, remoteness: 0 }, "primitive {pos:?}");
            continue;
        }

        let children: Vec<Value> = pos
            .legal_moves()
            .into_iter()
            .map(|mv| {
                let child = pos.apply(mv).unwrap();
                solver
                    .lookup(&child)
                    .unwrap_or_else(|| panic!("child after {mv} missing from table"))
            })
            .collect();
        assert!(!children.is_empty());

        let quickest_loss = children
            .iter()
            .filter(|c| c.outcome == Outcome::Lose)
            .map(|c| c.remoteness)
            .min();
        let all_win = children.iter().all(|c| c.outcome == Outcome::Win);

        match value.outcome {
            Outcome::Win => {
                assert_eq!(quickest_loss.map(|r| r + 1), Some(value.remoteness));
            }
            Outcome::Lose => {
                assert!(all_win);
                let slowest = children.iter().map(|c| c.remoteness).max();
                assert_eq!(slowest.map(|r| r + 1), Some(value.remoteness));
            }
            Outcome::Tie => {
                assert_eq!(quickest_loss, None);
                assert!(!all_win);
                assert!(children.iter().any(|c| c.outcome == Outcome::Tie));
                assert_eq!(value.remoteness, 0);
            }
        }
    }
}

#[test]
fn test_table_satisfies_backward_induction() {
    let mut solver = Solver::new();
    solver.solve(&head_on()).unwrap();
    assert!(solver.len() > 1);
    assert_backward_induction(&solver);
}

#[test]
fn test_first_mover_wins_symmetric_race() {
    // Mirrored pawns, equal distance: the mover gets there first.
    let pos = race(Player::One, cell(1, 1), cell(N as u8, N as u8));
    let value = solver::solve(&pos).unwrap();
    assert_eq!(value.outcome, Outcome::Win);
    assert_eq!(value.remoteness, 2 * (N as u32 - 1) - 1);
}

#[test]
fn test_solve_is_deterministic() {
    let mut a = Solver::new();
    let mut b = Solver::new();
    assert_eq!(a.solve(&head_on()), b.solve(&head_on()));
    assert_eq!(a.len(), b.len());
    for (pos, value) in a.entries() {
        assert_eq!(b.lookup(pos), Some(value));
    }
}

#[test]
fn test_reachable_positions_are_memoized() {
    let root = head_on();
    let mut solver = Solver::new();
    solver.solve(&root).unwrap();
    let expanded = solver.stats().expanded;
    let hits = solver.stats().cache_hits;

    // Every position two plies down is already in the table.
    for mv in root.legal_moves() {
        let child = root.apply(mv).unwrap();
        for reply in child.legal_moves() {
            let grandchild = child.apply(reply).unwrap();
            assert!(solver.lookup(&grandchild).is_some());
            solver.solve(&grandchild).unwrap();
        }
    }
    assert_eq!(solver.stats().expanded, expanded);
    assert!(solver.stats().cache_hits > hits);
}

#[test]
fn test_warm_table_saves_work() {
    let root = head_on();
    let child = root.apply(root.legal_moves()[0]).unwrap();

    let mut cold = Solver::new();
    cold.solve(&root).unwrap();

    let mut warm = Solver::new();
    warm.solve(&child).unwrap();
    let before = warm.stats().expanded;
    warm.solve(&root).unwrap();
    let second_run = warm.stats().expanded - before;

    assert!(second_run < cold.stats().expanded);
    assert_eq!(warm.lookup(&root), cold.lookup(&root));
}

#[test]
fn test_budget_failure_leaves_table_clean() {
    let mut solver = Solver::with_config(SolverConfig {
        max_positions: Some(3),
    });
    assert_eq!(
        solver.solve(&head_on()),
        Err(SolveError::Unresolved { budget: 3 })
    );
    assert!(solver.is_empty());
    assert_eq!(solver.lookup(&head_on()), None);

    // A generous budget succeeds and agrees with the unlimited solver.
    let mut roomy = Solver::with_config(SolverConfig {
        max_positions: Some(1_000_000),
    });
    assert_eq!(roomy.solve(&head_on()), solver::solve(&head_on()));
}

#[test]
fn test_best_move_follows_value() {
    let root = head_on();
    let mut solver = Solver::new();
    let value = solver.solve(&root).unwrap();
    let mv = solver.best_move(&root).unwrap().unwrap();
    let child = solver.solve(&root.apply(mv).unwrap()).unwrap();
    match value.outcome {
        Outcome::Win => assert_eq!(child, Value::lose(value.remoteness - 1)),
        Outcome::Lose => assert_eq!(child, Value::win(value.remoteness - 1)),
        Outcome::Tie => assert_eq!(child.outcome, Outcome::Tie),
    }
}

#[test]
fn test_table_survives_store_roundtrip() {
    let mut solver = Solver::new();
    solver.solve(&head_on()).unwrap();

    let mut bytes = Vec::new();
    store::save(&solver, &mut bytes).unwrap();
    let mut loaded = store::load(bytes.as_slice()).unwrap();

    assert_eq!(loaded.len(), solver.len());
    assert_backward_induction(&loaded);
    // A loaded table answers without expanding anything.
    assert_eq!(loaded.solve(&head_on()), solver.solve(&head_on()));
    assert_eq!(loaded.stats().expanded, 0);
}

#[test]
fn test_loaded_tie_reaches_parent() {
    // One is hopelessly behind, except that the table says advancing ties.
    let root = race(Player::One, cell(1, 2), cell(N as u8, 2));
    let advanced = race(Player::Two, cell(1, 3), cell(N as u8, 2));
    let key = serde_json::to_string(&PositionKey::from(&advanced)).unwrap();
    let text = format!(
        r#"{{"board_size": {N}, "entries": [{{"position": {key}, "value": {{"outcome": "tie", "remoteness": 0}}}}]}}"#
    );

    let mut solver = Solver::new();
    assert_eq!(store::load_into(&mut solver, text.as_bytes()).unwrap(), 1);
    let value = solver.solve(&root).unwrap();
    assert_eq!(value, Value::tie());
    assert_ne!(value.outcome, Outcome::Lose);

    let mv = solver.best_move(&root).unwrap().unwrap();
    let child = root.apply(mv).unwrap();
    assert_eq!(child, advanced);
    assert_eq!(solver.lookup(&child).map(|v| v.outcome), Some(Outcome::Tie));
    assert_backward_induction(&solver);
}

#[test]
fn test_fenced_race_with_a_wall_in_hand() {
    // One runs up column 1 and Two runs down column N, each fenced in by
    // vertical walls. One still holds a wall but has nothing useful to do
    // with it, since any wall across Two's column would seal Two in.
    let top = N as u8;
    let placed: Vec<Wall> = fence(1, (1..top - 1).step_by(2))
        .chain(fence(top - 1, (2..top).step_by(2)))
        .collect();
    let root = Position::new(Player::One, [1, 0], [cell(1, 1), cell(top, top)], placed).unwrap();

    let mut solver = Solver::with_config(SolverConfig {
        max_positions: Some(1_000_000),
    });
    let value = solver.solve(&root).unwrap();
    assert_eq!(value, Value::win(2 * (N as u32 - 1) - 1));
    assert_eq!(solver.best_move(&root), Ok(Some(Move::Pawn(cell(1, 2)))));

    // The wall moves were explored, and every one of them loses.
    assert!(
        solver
            .entries()
            .any(|(pos, _)| pos.placed_walls().len() > root.placed_walls().len())
    );
    for mv in root.legal_moves() {
        if let Move::Wall(_) = mv {
            let child = solver.lookup(&root.apply(mv).unwrap()).unwrap();
            assert_eq!(child.outcome, Outcome::Win);
        }
    }
    assert_backward_induction(&solver);
}

#[cfg(feature = "board5x5")]
#[test]
fn test_single_wall_game_is_consistent() {
    let pawns = Player::BOTH.map(Player::start_cell);
    let root = Position::new(Player::One, [1, 0], pawns, []).unwrap();
    let mut solver = Solver::new();
    let value = solver.solve(&root).unwrap();
    assert_backward_induction(&solver);

    // Some solved positions have a wall on the board.
    assert!(solver.entries().any(|(pos, _)| !pos.placed_walls().is_empty()));

    let mv = solver.best_move(&root).unwrap().unwrap();
    let child = solver.lookup(&root.apply(mv).unwrap()).unwrap();
    if value.outcome == Outcome::Win {
        assert_eq!(child, Value::lose(value.remoteness - 1));
    }
}
