use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ai::MoveSelector;
use crate::board::Board;
use crate::types::{Move, Player};

pub const DEFAULT_SIMULATIONS: u32 = 50;

/// Scores each candidate by the average final disc margin of random playouts.
#[derive(Debug, Clone)]
pub struct MonteCarloSelector {
    rng: StdRng,
    simulations: u32,
}

impl MonteCarloSelector {
    pub fn new(seed: u64, simulations: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            simulations: simulations.max(1),
        }
    }

    pub fn from_entropy(simulations: u32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            simulations: simulations.max(1),
        }
    }

    /// Plays uniformly random legal moves, passing when forced, until nobody can move.
    fn playout(&mut self, mut board: Board, mut to_move: Player) -> Board {
        loop {
            let moves = board.valid_moves(to_move).to_vec();
            if moves.is_empty() {
                to_move = !to_move;
                if !board.has_valid_move(to_move) {
                    return board;
                }
                continue;
            }

            let pick = moves[self.rng.gen_range(0..moves.len())];
            match board.apply(pick, to_move) {
                Ok(next) => board = next,
                Err(_) => return board,
            }
            to_move = !to_move;
        }
    }
}

impl MoveSelector for MonteCarloSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        let mut best: Option<(Move, f64)> = None;

        for mv in board.valid_moves(player).iter() {
            let Ok(next) = board.apply(mv, player) else {
                continue;
            };

            let mut total = 0i64;
            for _ in 0..self.simulations {
                let end = self.playout(next, !player);
                total += end.disc_counts().margin(player) as i64;
            }
            let average = total as f64 / self.simulations as f64;

            if best.is_none_or(|(_, best_score)| average > best_score) {
                best = Some((mv, average));
            }
        }

        best.map(|(mv, _)| mv)
    }
}
