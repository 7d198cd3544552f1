//! Random playouts (uniform random game simulation).
//!
//! A playout picks uniformly among the legal moves until a pawn reaches its goal
//! row or the ply cap runs out. Pawns may shuffle back and forth indefinitely,
//! so the cap is what guarantees termination. Given the same seed a playout is
//! fully reproducible.

use fastrand::Rng;
use tracing::debug;

use crate::board::Player;
use crate::position::{Move, Position};

/// Record of a single random game.
#[derive(Debug, Clone)]
pub struct Playout {
    /// Moves played, in order.
    pub moves: Vec<Move>,
    /// Position after the last move.
    pub last: Position,
    /// Player whose pawn reached its goal, or `None` if the ply cap was hit.
    pub winner: Option<Player>,
}

/// Play uniformly random legal moves from `start` for at most `max_plies` plies.
pub fn random_playout(start: &Position, rng: &mut Rng, max_plies: usize) -> Playout {
    let mut pos = start.clone();
    let mut moves = Vec::new();

    while moves.len() < max_plies && !pos.is_primitive() {
        let legal = pos.legal_moves();
        if legal.is_empty() {
            break;
        }
        let mv = legal[rng.usize(..legal.len())];
        pos = pos.child(mv);
        moves.push(mv);
    }

    Playout {
        winner: pos.winner(),
        moves,
        last: pos,
    }
}

/// Aggregate results over many playouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayoutSummary {
    pub games: u64,
    /// Wins indexed by [`Player::index`].
    pub wins: [u64; 2],
    /// Games stopped by the ply cap.
    pub unfinished: u64,
    pub total_plies: u64,
}

impl PlayoutSummary {
    pub fn record(&mut self, playout: &Playout) {
        self.games += 1;
        self.total_plies += playout.moves.len() as u64;
        match playout.winner {
            Some(player) => self.wins[player.index()] += 1,
            None => self.unfinished += 1,
        }
    }

    pub fn mean_plies(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.games as f64
        }
    }
}

/// Run `games` playouts from `start` with one shared generator.
pub fn run_playouts(start: &Position, rng: &mut Rng, games: u64, max_plies: usize) -> PlayoutSummary {
    let mut summary = PlayoutSummary::default();
    for game in 0..games {
        let playout = random_playout(start, rng, max_plies);
        debug!(game, plies = playout.moves.len(), winner = ?playout.winner, "playout finished");
        summary.record(&playout);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_PLIES;

    #[test]
    fn test_playout_is_reproducible() {
        let start = Position::start();
        let a = random_playout(&start, &mut Rng::with_seed(7), DEFAULT_MAX_PLIES);
        let b = random_playout(&start, &mut Rng::with_seed(7), DEFAULT_MAX_PLIES);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.last, b.last);
        assert_eq!(a.winner, b.winner);
    }

    #[test]
    fn test_playout_respects_cap() {
        let start = Position::start();
        let playout = random_playout(&start, &mut Rng::with_seed(1), 3);
        assert!(playout.moves.len() <= 3);
        assert_eq!(random_playout(&start, &mut Rng::with_seed(1), 0).moves.len(), 0);
    }

    #[test]
    fn test_playout_replays_legally() {
        let start = Position::start();
        let mut rng = Rng::with_seed(42);
        for _ in 0..5 {
            let playout = random_playout(&start, &mut rng, DEFAULT_MAX_PLIES);
            let mut pos = start.clone();
            for &mv in &playout.moves {
                pos = pos.apply(mv).unwrap();
                assert!(pos.board().is_globally_valid());
            }
            assert_eq!(pos, playout.last);
            if let Some(winner) = playout.winner {
                assert!(pos.is_primitive());
                // The winner made the last move, so the loser is to move.
                assert_eq!(pos.turn(), winner.other());
            } else {
                assert_eq!(playout.moves.len(), DEFAULT_MAX_PLIES);
            }
        }
    }

    #[test]
    fn test_summary_counts() {
        let start = Position::start();
        let summary = run_playouts(&start, &mut Rng::with_seed(3), 4, DEFAULT_MAX_PLIES);
        assert_eq!(summary.games, 4);
        assert_eq!(summary.wins[0] + summary.wins[1] + summary.unfinished, 4);
        assert!(summary.mean_plies() > 0.0);
    }
}
