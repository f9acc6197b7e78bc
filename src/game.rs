use tracing::{debug, info};

use crate::ai::MoveSelector;
use crate::board::{Board, ValidMoveSet};
use crate::engine::calculate_winner;
use crate::error::EngineError;
use crate::types::{GameOutcome, GameResult, GameState, Move, Player, Ply};

/// What a successful [`GameSession::submit_move`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub ply: Ply,
    pub flipped: Vec<Move>,
    /// The side skipped because it had no legal reply.
    pub passed: Option<Player>,
    pub winner: Option<GameOutcome>,
}

/// Turn orchestration over an immutable [`Board`].
///
/// `valid_moves` is recomputed after every change, and a side without a legal
/// move is passed automatically while the other side can still play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    start: Board,
    start_player: Player,
    board: Board,
    current_player: Player,
    valid_moves: ValidMoveSet,
    winner: Option<GameOutcome>,
    history: Vec<Ply>,
    flipped: Vec<Move>,
    passed: Option<Player>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::from_position(Board::new(), Player::Dark)
    }

    /// Starts a session from an arbitrary position with `to_move` on turn.
    ///
    /// If `to_move` cannot play but the opponent can, the turn passes at once.
    pub fn from_position(board: Board, to_move: Player) -> Self {
        let mut session = Self {
            start: board,
            start_player: to_move,
            board,
            current_player: to_move,
            valid_moves: ValidMoveSet::default(),
            winner: None,
            history: Vec::new(),
            flipped: Vec::new(),
            passed: None,
        };
        session.settle();
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn valid_moves(&self) -> ValidMoveSet {
        self.valid_moves
    }

    pub fn winner(&self) -> Option<GameOutcome> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn history(&self) -> &[Ply] {
        &self.history
    }

    pub fn move_history(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|ply| ply.mv)
    }

    /// Side skipped after the last move, if any.
    pub fn passed(&self) -> Option<Player> {
        self.passed
    }

    /// Plays `mv` for the side on turn.
    pub fn submit_move(&mut self, mv: Move) -> Result<MoveOutcome, EngineError> {
        if self.winner.is_some() {
            return Err(EngineError::GameOver);
        }
        let player = self.current_player;
        if !self.valid_moves.contains(mv) {
            return Err(EngineError::IllegalMove { mv, player });
        }

        let (next, flipped) = self.board.apply_with_flips(mv, player)?;
        let ply = Ply { mv, player };

        self.board = next;
        self.history.push(ply);
        self.flipped = flipped;
        self.current_player = !player;
        self.settle();

        debug!(
            %mv,
            %player,
            flipped = self.flipped.len(),
            passed = ?self.passed,
            "applied move"
        );
        if let Some(outcome) = self.winner {
            let score = self.board.disc_counts();
            info!(?outcome, dark = score.dark, light = score.light, "game over");
        }

        Ok(MoveOutcome {
            ply,
            flipped: self.flipped.clone(),
            passed: self.passed,
            winner: self.winner,
        })
    }

    /// Plays `mv` on behalf of `player`, refusing if it is not their turn.
    pub fn submit_for(&mut self, player: Player, mv: Move) -> Result<MoveOutcome, EngineError> {
        if self.winner.is_some() {
            return Err(EngineError::GameOver);
        }
        if player != self.current_player {
            return Err(EngineError::WrongTurn {
                expected: self.current_player,
                got: player,
            });
        }
        self.submit_move(mv)
    }

    /// Entry point for untrusted coordinates.
    pub fn submit_at(&mut self, row: u8, col: u8) -> Result<MoveOutcome, EngineError> {
        let mv = Move::new(row, col)?;
        self.submit_move(mv)
    }

    /// Lets `selector` choose the move for the side on turn.
    pub fn play_with(&mut self, selector: &mut dyn MoveSelector) -> Result<MoveOutcome, EngineError> {
        if self.winner.is_some() {
            return Err(EngineError::GameOver);
        }
        let mv = selector
            .select_move(&self.board, self.current_player)
            .ok_or(EngineError::NoMoveAvailable)?;
        debug!(%mv, player = %self.current_player, "selector chose move");
        self.submit_move(mv)
    }

    /// Takes back the last move by replaying the history from the start.
    pub fn undo(&mut self) -> Result<Ply, EngineError> {
        let mut history = self.history.clone();
        let undone = history.pop().ok_or(EngineError::NothingToUndo)?;

        let mut replay = Self::from_position(self.start, self.start_player);
        for ply in history {
            replay.submit_for(ply.player, ply.mv)?;
        }
        *self = replay;
        Ok(undone)
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            board: self.board.cells(),
            current_player: self.current_player,
            valid_moves: self.valid_moves.to_vec(),
            score: self.board.disc_counts(),
            is_game_over: self.is_over(),
            winner: self.winner,
            passed: self.passed,
            flipped: self.flipped.clone(),
            history: self.history.clone(),
        }
    }

    /// `None` while the game is still running.
    pub fn to_game_result(&self) -> Option<GameResult> {
        self.winner.map(|outcome| GameResult {
            outcome,
            score: self.board.disc_counts(),
        })
    }

    fn settle(&mut self) {
        self.passed = None;
        self.winner = calculate_winner(&self.board);
        if self.winner.is_none() && !self.board.has_valid_move(self.current_player) {
            // Not terminal, so the other side must have a move.
            self.passed = Some(self.current_player);
            self.current_player = !self.current_player;
        }
        self.valid_moves = self.board.valid_moves(self.current_player);
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FirstLegalMoveSelector;
    use crate::test_utils::board_from_rows;
    use crate::types::{Cell, Score};

    fn mv(row: u8, col: u8) -> Move {
        Move::new(row, col).unwrap()
    }

    /// (0,0) empty, (0,1) dark, everything else light.
    fn dark_is_stuck() -> Board {
        board_from_rows([
            ".BWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
        ])
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameSession::new();
        let state = game.to_game_state();

        assert_eq!(state.current_player, Player::Dark);
        assert_eq!(state.score, Score { dark: 2, light: 2 });
        assert!(!state.is_game_over);
        assert_eq!(state.passed, None);
        assert!(state.flipped.is_empty());
        assert_eq!(
            state.valid_moves,
            vec![mv(2, 3), mv(3, 2), mv(4, 5), mv(5, 4)]
        );
    }

    #[test]
    fn dark_opening_move_hands_turn_to_light() {
        let mut game = GameSession::new();

        let outcome = game.submit_move(mv(2, 3)).unwrap();

        assert_eq!(outcome.flipped, vec![mv(3, 3)]);
        assert_eq!(outcome.passed, None);
        let board = game.board();
        for square in [mv(2, 3), mv(3, 3), mv(3, 4), mv(4, 3)] {
            assert_eq!(board.cell_at(square), Cell::Dark);
        }
        assert_eq!(board.disc_counts().light, 1);
        assert_eq!(board.cell_at(mv(4, 4)), Cell::Light);
        assert_eq!(game.current_player(), Player::Light);
        assert!(!game.valid_moves().is_empty());
        assert_eq!(game.move_history().collect::<Vec<_>>(), vec![mv(2, 3)]);
    }

    #[test]
    fn illegal_move_returns_error_and_keeps_state() {
        let mut game = GameSession::new();
        let before = game.clone();

        let err = game.submit_move(mv(0, 0)).unwrap_err();

        assert!(matches!(
            err,
            EngineError::IllegalMove {
                player: Player::Dark,
                ..
            }
        ));
        assert_eq!(game, before);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut game = GameSession::new();

        assert!(matches!(
            game.submit_at(3, 9),
            Err(EngineError::OutOfBounds { row: 3, col: 9 })
        ));
    }

    #[test]
    fn stuck_player_passes_at_start_of_turn() {
        let game = GameSession::from_position(dark_is_stuck(), Player::Dark);

        assert_eq!(game.current_player(), Player::Light);
        assert_eq!(game.passed(), Some(Player::Dark));
        assert!(!game.is_over());
        assert_eq!(game.valid_moves().to_vec(), vec![mv(0, 0)]);
    }

    #[test]
    fn opponent_without_reply_is_passed_after_move() {
        let board = board_from_rows([
            "BW......",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "......WB",
        ]);
        let mut game = GameSession::from_position(board, Player::Dark);

        let outcome = game.submit_move(mv(0, 2)).unwrap();

        assert_eq!(outcome.passed, Some(Player::Light));
        assert_eq!(game.current_player(), Player::Dark);
        assert!(!game.is_over());
        assert!(game.valid_moves().contains(mv(7, 5)));

        let outcome = game.submit_move(mv(7, 5)).unwrap();
        assert_eq!(outcome.winner, Some(GameOutcome::Winner(Player::Dark)));
    }

    #[test]
    fn position_with_no_moves_for_either_side_is_over() {
        let board = board_from_rows([
            ".BBBBBBB",
            "BBBBBBBB",
            "BBBBBBBB",
            "BBBBBBBB",
            "BBBBBBBB",
            "BBBBBBBB",
            "BBBBBBBB",
            "BBBBBBBB",
        ]);
        let mut game = GameSession::from_position(board, Player::Dark);

        assert_eq!(game.winner(), Some(GameOutcome::Winner(Player::Dark)));
        assert!(game.valid_moves().is_empty());
        assert!(matches!(
            game.submit_move(mv(0, 0)),
            Err(EngineError::GameOver)
        ));
    }

    #[test]
    fn full_board_after_move_sets_game_over() {
        let mut game = GameSession::from_position(dark_is_stuck(), Player::Light);
        let mut selector = FirstLegalMoveSelector;

        let outcome = game.play_with(&mut selector).unwrap();

        assert_eq!(outcome.ply, Ply { mv: mv(0, 0), player: Player::Light });
        assert_eq!(outcome.flipped, vec![mv(0, 1)]);
        assert_eq!(outcome.winner, Some(GameOutcome::Winner(Player::Light)));
        let result = game.to_game_result().unwrap();
        assert_eq!(result.score, Score { dark: 0, light: 64 });
        assert!(matches!(
            game.play_with(&mut selector),
            Err(EngineError::GameOver)
        ));
    }

    #[test]
    fn submit_for_checks_the_turn() {
        let mut game = GameSession::new();

        let err = game.submit_for(Player::Light, mv(2, 3)).unwrap_err();

        assert!(matches!(
            err,
            EngineError::WrongTurn {
                expected: Player::Dark,
                got: Player::Light
            }
        ));
        assert!(game.submit_for(Player::Dark, mv(2, 3)).is_ok());
    }

    #[test]
    fn undo_restores_previous_position() {
        let mut game = GameSession::new();
        game.submit_move(mv(2, 3)).unwrap();
        let after_first = game.clone();
        game.submit_move(mv(2, 2)).unwrap();

        let undone = game.undo().unwrap();

        assert_eq!(undone, Ply { mv: mv(2, 2), player: Player::Light });
        assert_eq!(game.board(), after_first.board());
        assert_eq!(game.current_player(), Player::Light);
        assert_eq!(game.history(), after_first.history());

        game.undo().unwrap();
        assert_eq!(game, GameSession::new());
        assert!(matches!(game.undo(), Err(EngineError::NothingToUndo)));
    }

    #[test]
    fn self_play_keeps_invariants_to_the_end() {
        let mut game = GameSession::new();
        let mut selector = FirstLegalMoveSelector;

        while !game.is_over() {
            let before = game.board().disc_counts().total();
            assert_eq!(
                game.valid_moves(),
                game.board().valid_moves(game.current_player())
            );
            game.play_with(&mut selector).unwrap();
            assert_eq!(game.board().disc_counts().total(), before + 1);
        }

        assert!(game.to_game_result().is_some());
        assert!(game.valid_moves().is_empty());
    }
}
