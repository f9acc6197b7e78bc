use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod bridge;
pub mod duo;
pub mod engine;
pub mod error;
pub mod game;
pub mod puzzle;
pub mod types;
pub mod wasm;

#[cfg(test)]
mod test_utils;

pub use board::{Board, ValidMoveSet};
pub use engine::{calculate_winner, get_valid_moves, initialize_board, make_move};
pub use error::EngineError;
pub use game::{GameSession, MoveOutcome};
pub use types::{Cell, GameOutcome, Move, Player, Score};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
