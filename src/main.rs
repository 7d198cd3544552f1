//! Quoridor-Solver command line.
//!
//! ## Usage
//!
//! - `quoridor-solver` - Start the command shell on stdin/stdout
//! - `quoridor-solver shell --budget 1000000` - Shell whose solves give up past a budget
//! - `quoridor-solver solve --walls 0` - Solve the start position
//! - `quoridor-solver playout --games 100` - Run random playouts
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quoridor_solver::board::Player;
use quoridor_solver::constants::{DEFAULT_MAX_PLIES, N, START_WALLS};
use quoridor_solver::playout::run_playouts;
use quoridor_solver::position::Position;
use quoridor_solver::shell::Shell;
use quoridor_solver::solver::{Solver, SolverConfig};
use quoridor_solver::store;

/// Quoridor-Solver: exhaustive win/lose/tie analysis for Quoridor
#[derive(Parser)]
#[command(name = "quoridor-solver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from stdin and answer on stdout
    Shell {
        /// Give up a `solve` or `genmove` after expanding this many positions
        #[arg(long)]
        budget: Option<usize>,
        /// JSON table to preload and save back on exit
        #[arg(long)]
        table: Option<PathBuf>,
    },
    /// Solve the start position and print its value and best move
    Solve {
        /// Walls per player (defaults to the full allotment)
        #[arg(long)]
        walls: Option<u8>,
        /// Give up after expanding this many positions
        #[arg(long)]
        budget: Option<usize>,
        /// JSON table to preload and save back after solving
        #[arg(long)]
        table: Option<PathBuf>,
    },
    /// Run random playouts from the start position
    Playout {
        #[arg(long, default_value_t = 100)]
        games: u64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
        max_plies: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Shell { budget, table }) => run_shell(budget, table),
        None => run_shell(None, None),
        Some(Commands::Solve {
            walls,
            budget,
            table,
        }) => run_solve(walls, budget, table),
        Some(Commands::Playout {
            games,
            seed,
            max_plies,
        }) => {
            run_playout(games, seed, max_plies);
            Ok(())
        }
    }
}

fn open_solver(config: SolverConfig, table: Option<&PathBuf>) -> Result<Solver> {
    let mut solver = Solver::with_config(config);
    if let Some(path) = table.filter(|path| path.exists()) {
        store::load_file(&mut solver, path)
            .with_context(|| format!("failed to load table from {}", path.display()))?;
    }
    Ok(solver)
}

fn save_solver(solver: &Solver, table: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = table {
        store::save_file(solver, path)
            .with_context(|| format!("failed to save table to {}", path.display()))?;
    }
    Ok(())
}

fn run_shell(budget: Option<usize>, table: Option<PathBuf>) -> Result<()> {
    let config = SolverConfig {
        max_positions: budget,
    };
    let mut shell = Shell::with_solver(open_solver(config, table.as_ref())?);
    shell
        .run(io::stdin().lock(), io::stdout().lock())
        .context("shell i/o failed")?;
    save_solver(&shell.into_solver(), table.as_ref())
}

fn run_solve(walls: Option<u8>, budget: Option<usize>, table: Option<PathBuf>) -> Result<()> {
    let walls = walls.unwrap_or(START_WALLS);
    let pawns = Player::BOTH.map(Player::start_cell);
    let start = Position::new(Player::One, [walls, walls], pawns, [])
        .context("invalid start position")?;

    let config = SolverConfig {
        max_positions: budget,
    };
    let mut solver = open_solver(config, table.as_ref())?;
    info!(board = N, walls, "solving start position");

    let value = solver.solve(&start).context("solve failed")?;
    let best = solver.best_move(&start).context("solve failed")?;

    println!("{start}");
    println!("value: {value}");
    if let Some(mv) = best {
        println!("best move: {mv}");
    }
    let stats = solver.stats();
    println!(
        "positions: {} (expanded {}, cache hits {})",
        solver.len(),
        stats.expanded,
        stats.cache_hits
    );

    save_solver(&solver, table.as_ref())
}

fn run_playout(games: u64, seed: u64, max_plies: usize) {
    let start = Position::start();
    let mut rng = fastrand::Rng::with_seed(seed);
    let summary = run_playouts(&start, &mut rng, games, max_plies);

    println!("games: {}", summary.games);
    for player in Player::BOTH {
        println!("player {player} wins: {}", summary.wins[player.index()]);
    }
    println!("unfinished: {}", summary.unfinished);
    println!("mean plies: {:.1}", summary.mean_plies());
}
