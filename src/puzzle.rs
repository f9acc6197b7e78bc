//! "Training academy" puzzles: find the strongest move in a random position.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::board::{Board, ValidMoveSet};
use crate::error::EngineError;
use crate::game::GameSession;
use crate::types::{Move, Player};

pub const LEVELS: RangeInclusive<u8> = 1..=15;

const MAX_RANDOM_PLIES: u32 = 20;
const MAX_ATTEMPTS: u32 = 32;
const CORNER_BONUS: u32 = 10;
const EDGE_BONUS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleVerdict {
    Correct,
    Incorrect,
    /// Not even a legal move; the UI ignores the click.
    Illegal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Puzzle {
    level: u8,
    board: Board,
    to_move: Player,
    valid_moves: ValidMoveSet,
    target: Move,
}

impl Puzzle {
    /// Plays `min(4 + 2 * level, 20)` random plies from the opening and asks
    /// for the best reply of whoever is on turn.
    pub fn generate<R: Rng>(level: u8, rng: &mut R) -> Result<Self, EngineError> {
        if !LEVELS.contains(&level) {
            return Err(EngineError::PuzzleLevel(level));
        }
        let plies = (4 + 2 * level as u32).min(MAX_RANDOM_PLIES);

        for _ in 0..MAX_ATTEMPTS {
            let mut session = GameSession::new();
            for _ in 0..plies {
                if session.is_over() {
                    break;
                }
                let moves = session.valid_moves().to_vec();
                let pick = moves[rng.gen_range(0..moves.len())];
                session.submit_move(pick)?;
            }
            if session.is_over() {
                continue;
            }

            if let Some(puzzle) = Self::from_position(level, *session.board(), session.current_player()) {
                info!(level, to_move = %puzzle.to_move, target = %puzzle.target, "generated puzzle");
                return Ok(puzzle);
            }
        }

        Err(EngineError::PuzzleExhausted)
    }

    /// Builds a puzzle from a fixed position. `None` if `to_move` has no move.
    pub fn from_position(level: u8, board: Board, to_move: Player) -> Option<Self> {
        let valid_moves = board.valid_moves(to_move);
        let target = best_move(&board, to_move, valid_moves)?;
        Some(Self {
            level,
            board,
            to_move,
            valid_moves,
            target,
        })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn valid_moves(&self) -> ValidMoveSet {
        self.valid_moves
    }

    /// The move shown by "reveal solution".
    pub fn solution(&self) -> Move {
        self.target
    }

    pub fn check(&self, mv: Move) -> PuzzleVerdict {
        if !self.valid_moves.contains(mv) {
            PuzzleVerdict::Illegal
        } else if mv == self.target {
            PuzzleVerdict::Correct
        } else {
            PuzzleVerdict::Incorrect
        }
    }
}

/// Flip count plus corner and edge bonuses; first best in row-major order.
fn best_move(board: &Board, player: Player, moves: ValidMoveSet) -> Option<Move> {
    let mut best: Option<(Move, u32)> = None;
    for mv in moves.iter() {
        let mut score = board.flips(mv, player).len() as u32;
        if mv.is_corner() {
            score += CORNER_BONUS;
        }
        if mv.is_edge() {
            score += EDGE_BONUS;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }
    best.map(|(mv, _)| mv)
}
