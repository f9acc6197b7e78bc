use thiserror::Error;

use crate::types::{Move, Player};

/// Everything the engine can refuse. None of these leave a session half-updated.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("illegal move {mv} for {player}")]
    IllegalMove { mv: Move, player: Player },

    #[error("game is already over")]
    GameOver,

    #[error("row/col out of range: ({row}, {col})")]
    OutOfBounds { row: u8, col: u8 },

    #[error("it is {expected}'s turn, not {got}'s")]
    WrongTurn { expected: Player, got: Player },

    #[error("message belongs to another session")]
    SessionMismatch,

    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),

    #[error("no move to undo")]
    NothingToUndo,

    #[error("unknown difficulty {0:?}")]
    UnknownDifficulty(String),

    #[error("selector could not produce a move")]
    NoMoveAvailable,

    #[error("puzzle level {0} is out of range")]
    PuzzleLevel(u8),

    #[error("could not generate a playable puzzle position")]
    PuzzleExhausted,

    #[error("malformed wire message: {0}")]
    Wire(#[from] serde_json::Error),

    #[error("bridge is not connected")]
    BridgeUnavailable,

    #[error("peer channel closed")]
    ChannelClosed,
}
