//! Move selectors behind the solo/AI game modes.

mod montecarlo;
mod search;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::EngineError;
use crate::types::{Move, Player};

pub use montecarlo::{DEFAULT_SIMULATIONS, MonteCarloSelector};
pub use search::{MinimaxSelector, SearchLimits, Searcher, evaluate};

const CORNER_BONUS: u32 = 10;
/// Below this many discs the hybrid player samples instead of searching.
const HYBRID_DISC_THRESHOLD: u8 = 20;

/// Chooses a move for `player`. Returns `None` when there is no legal move.
pub trait MoveSelector: Send {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Move>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        board.valid_moves(player).first()
    }
}

#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl MoveSelector for RandomSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        board.valid_moves(player).to_vec().choose(&mut self.rng).copied()
    }
}

/// Maximises own disc count after the move, with a bonus for corners.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedySelector;

impl MoveSelector for GreedySelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        let mut best: Option<(Move, u32)> = None;
        for mv in board.valid_moves(player).iter() {
            let Ok(next) = board.apply(mv, player) else {
                continue;
            };
            let mut score = next.disc_counts().of(player) as u32;
            if mv.is_corner() {
                score += CORNER_BONUS;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

/// Samples in the opening, searches once the board fills up.
#[derive(Debug, Clone)]
pub struct HybridSelector {
    early: MonteCarloSelector,
    late: MinimaxSelector,
}

impl HybridSelector {
    pub fn new(early: MonteCarloSelector, late: MinimaxSelector) -> Self {
        Self { early, late }
    }
}

impl MoveSelector for HybridSelector {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        if board.disc_counts().total() < HYBRID_DISC_THRESHOLD {
            self.early.select_move(board, player)
        } else {
            self.late.select_move(board, player)
        }
    }
}

/// AI strength, named by the ids the game UI uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    #[default]
    Random,
    Greedy,
    #[serde(rename = "minimax-3")]
    Minimax3,
    #[serde(rename = "minimax-4")]
    Minimax4,
    MonteCarlo,
    Hybrid,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Random,
        Difficulty::Greedy,
        Difficulty::Minimax3,
        Difficulty::Minimax4,
        Difficulty::MonteCarlo,
        Difficulty::Hybrid,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Difficulty::Random => "random",
            Difficulty::Greedy => "greedy",
            Difficulty::Minimax3 => "minimax-3",
            Difficulty::Minimax4 => "minimax-4",
            Difficulty::MonteCarlo => "monte-carlo",
            Difficulty::Hybrid => "hybrid",
        }
    }

    /// Builds the selector for this difficulty. `seed` makes random play repeatable.
    pub fn selector(self, seed: Option<u64>) -> Box<dyn MoveSelector> {
        let monte_carlo = || match seed {
            Some(seed) => MonteCarloSelector::new(seed, DEFAULT_SIMULATIONS),
            None => MonteCarloSelector::from_entropy(DEFAULT_SIMULATIONS),
        };
        match self {
            Difficulty::Random => Box::new(match seed {
                Some(seed) => RandomSelector::new(seed),
                None => RandomSelector::from_entropy(),
            }),
            Difficulty::Greedy => Box::new(GreedySelector),
            Difficulty::Minimax3 => Box::new(MinimaxSelector::new(SearchLimits::depth(3))),
            Difficulty::Minimax4 => Box::new(MinimaxSelector::new(SearchLimits::depth(4))),
            Difficulty::MonteCarlo => Box::new(monte_carlo()),
            Difficulty::Hybrid => Box::new(HybridSelector::new(
                monte_carlo(),
                MinimaxSelector::new(SearchLimits::depth(4)),
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.id() == s)
            .ok_or_else(|| EngineError::UnknownDifficulty(s.to_string()))
    }
}
