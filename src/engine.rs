//! Free-function entry points used by UI and bridge glue.
//!
//! These are thin wrappers over [`Board`]; turn order lives in
//! [`crate::game::GameSession`].

use crate::board::{Board, ValidMoveSet};
use crate::error::EngineError;
use crate::types::{GameOutcome, Move, Player, Score};

/// Returns the standard opening position.
pub fn initialize_board() -> Board {
    Board::new()
}

pub fn get_valid_moves(board: &Board, player: Player) -> ValidMoveSet {
    board.valid_moves(player)
}

/// Applies `player`'s disc at `(row, col)` and returns the resulting board.
///
/// Does not advance any turn.
pub fn make_move(board: &Board, row: u8, col: u8, player: Player) -> Result<Board, EngineError> {
    let mv = Move::new(row, col)?;
    board.apply(mv, player)
}

/// Decides the game if it is over.
///
/// The game ends when the board is full or neither side can move. The side
/// with more discs wins; equal counts are a draw.
pub fn calculate_winner(board: &Board) -> Option<GameOutcome> {
    let is_over = board.is_full()
        || (!board.has_valid_move(Player::Dark) && !board.has_valid_move(Player::Light));
    if !is_over {
        return None;
    }

    let Score { dark, light } = board.disc_counts();
    Some(match dark.cmp(&light) {
        std::cmp::Ordering::Greater => GameOutcome::Winner(Player::Dark),
        std::cmp::Ordering::Less => GameOutcome::Winner(Player::Light),
        std::cmp::Ordering::Equal => GameOutcome::Draw,
    })
}

pub fn score(board: &Board) -> Score {
    board.disc_counts()
}
