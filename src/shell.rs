//! Line-oriented command shell for driving the solver from scripts or a GUI.
//!
//! The framing follows the Go Text Protocol: each request is an optional
//! numeric id, a command and its arguments. A success is answered with
//! `=id response` and a failure with `?id message`, each followed by a blank
//! line. Blank lines and `#` comments are ignored.
//!
//! ## Supported Commands
//!
//! - `name`, `version` - Identify the engine
//! - `list_commands`, `known_command <cmd>` - Command discovery
//! - `quit` - Exit the loop
//! - `reset` - Return to the start position
//! - `walls <n>` - Restart with `n` walls per player
//! - `show` - Render the current position
//! - `moves` - List the legal moves in notation
//! - `play <move>` - Play a move such as `e2` or `c3h`
//! - `undo` - Take back the last move
//! - `solve` - Value of the current position for the player to move
//! - `genmove` - Play the solver's best move and print it
//!
//! The solver and its memo table persist across commands, so repeated queries
//! along one game are answered from the table.

use std::io::{self, BufRead, Write};

use crate::board::Player;
use crate::constants::START_WALLS;
use crate::position::{Move, Position};
use crate::solver::Solver;

const KNOWN_COMMANDS: &[&str] = &[
    "genmove",
    "known_command",
    "list_commands",
    "moves",
    "name",
    "play",
    "quit",
    "reset",
    "show",
    "solve",
    "undo",
    "version",
    "walls",
];

pub struct Shell {
    pos: Position,
    /// Positions before each played move, for `undo`.
    history: Vec<Position>,
    /// Position that `reset` returns to.
    origin: Position,
    solver: Solver,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self::with_solver(Solver::new())
    }

    /// A shell that answers from an existing, possibly preloaded, solver.
    pub fn with_solver(solver: Solver) -> Self {
        let pos = Position::start();
        Self {
            origin: pos.clone(),
            pos,
            history: Vec::new(),
            solver,
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    pub fn into_solver(self) -> Solver {
        self.solver
    }

    /// Serve commands from `input` until end of input or `quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric command id from the front of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn restart(&mut self, origin: Position) {
        self.origin = origin.clone();
        self.pos = origin;
        self.history.clear();
    }

    /// Execute one command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "reset" => {
                self.restart(self.origin.clone());
                (true, String::new())
            }

            "walls" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(walls) = arg.parse::<u8>() else {
                    return (false, format!("invalid wall count: {arg}"));
                };
                if walls > START_WALLS {
                    return (false, format!("at most {START_WALLS} walls per player"));
                }
                let pawns = Player::BOTH.map(Player::start_cell);
                match Position::new(Player::One, [walls, walls], pawns, []) {
                    Ok(origin) => {
                        self.restart(origin);
                        (true, String::new())
                    }
                    Err(err) => (false, err.to_string()),
                }
            }

            "show" => (true, format!("\n{}", self.pos.to_string().trim_end())),

            "moves" => {
                let moves: Vec<String> = self
                    .pos
                    .legal_moves()
                    .iter()
                    .map(Move::to_string)
                    .collect();
                (true, moves.join(" "))
            }

            "play" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let mv = match arg.to_lowercase().parse::<Move>() {
                    Ok(mv) => mv,
                    Err(err) => return (false, err.to_string()),
                };
                match self.pos.apply(mv) {
                    Ok(next) => {
                        self.history.push(std::mem::replace(&mut self.pos, next));
                        (true, String::new())
                    }
                    Err(err) => (false, err.to_string()),
                }
            }

            "undo" => match self.history.pop() {
                Some(previous) => {
                    self.pos = previous;
                    (true, String::new())
                }
                None => (false, "nothing to undo".to_string()),
            },

            "solve" => match self.solver.solve(&self.pos) {
                Ok(value) => (true, value.to_string()),
                Err(err) => (false, err.to_string()),
            },

            "genmove" => match self.solver.best_move(&self.pos) {
                Ok(Some(mv)) => {
                    let next = self.pos.child(mv);
                    self.history.push(std::mem::replace(&mut self.pos, next));
                    (true, mv.to_string())
                }
                Ok(None) => (false, "game over".to_string()),
                Err(err) => (false, err.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolverConfig;

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = Shell::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = Shell::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut shell = Shell::new();
        let (success, response) = shell.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "quoridor-solver");
    }

    #[test]
    fn test_known_command() {
        let mut shell = Shell::new();

        let (success, response) = shell.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = shell.execute("known_command", &["komi"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_play_undo_reset() {
        let mut shell = Shell::new();
        let start = shell.position().clone();

        let stay = Player::One.start_cell().to_string();
        let (success, _) = shell.execute("play", &[stay.as_str()]);
        assert!(!success, "pawn cannot stay in place");

        let (success, _) = shell.execute("play", &["a1h"]);
        assert!(success);
        assert_eq!(shell.position().walls_left(Player::One), START_WALLS - 1);

        let (success, _) = shell.execute("play", &["a1h"]);
        assert!(!success, "wall already placed");

        let (success, _) = shell.execute("undo", &[]);
        assert!(success);
        assert_eq!(shell.position(), &start);

        let (success, _) = shell.execute("undo", &[]);
        assert!(!success);

        shell.execute("play", &["a1v"]);
        let (success, _) = shell.execute("reset", &[]);
        assert!(success);
        assert_eq!(shell.position(), &start);
    }

    #[test]
    fn test_walls_command() {
        let mut shell = Shell::new();
        let (success, _) = shell.execute("walls", &["0"]);
        assert!(success);
        assert_eq!(shell.position().walls_left(Player::Two), 0);

        // Without walls only pawn steps remain: left, right and forward.
        let (_, moves) = shell.execute("moves", &[]);
        assert_eq!(moves.split(' ').count(), 3);

        let too_many = (START_WALLS + 1).to_string();
        let (success, _) = shell.execute("walls", &[too_many.as_str()]);
        assert!(!success);
        let (success, _) = shell.execute("walls", &["x"]);
        assert!(!success);

        // Reset keeps the chosen wall count.
        shell.execute("reset", &[]);
        assert_eq!(shell.position().walls_left(Player::One), 0);
    }

    #[test]
    fn test_solve_budget_reported() {
        let solver = Solver::with_config(SolverConfig {
            max_positions: Some(5),
        });
        let mut shell = Shell::with_solver(solver);
        let (success, response) = shell.execute("solve", &[]);
        assert!(!success);
        assert!(response.contains("unresolved"));
        assert!(shell.solver().is_empty());
        // The budget travels with the solver handed back on exit.
        let mut solver = shell.into_solver();
        assert!(solver.is_empty());
        assert!(solver.solve(&Position::start()).is_err());
    }

    #[test]
    fn test_run_loop() {
        let input = "1 name\n# comment\n\nbogus\n2 play zz\n3 quit\nname\n";
        let mut output = Vec::new();
        Shell::new().run(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("=1 quoridor-solver\n\n"));
        assert!(text.contains("? unknown command: bogus\n\n"));
        assert!(text.contains("?2 "));
        assert!(text.ends_with("=3 \n\n"));
    }
}
