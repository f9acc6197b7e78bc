//! Contract with the external AI/network bridge.
//!
//! The bridge speaks JSON over HTTP: `GET board`, `POST move` and `GET status`.
//! This module owns the payload shapes and the [`GameBridge`] capability; the
//! transport lives outside the crate.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::Board;
use crate::error::EngineError;
use crate::game::GameSession;
use crate::types::{GameOutcome, Move, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Waiting,
    Playing,
    Ended,
}

/// Response body of `GET board`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub current_player: Player,
    #[serde(default)]
    pub game_status: GameStatus,
    #[serde(default)]
    pub winner: Option<GameOutcome>,
}

impl BoardSnapshot {
    pub fn from_session(session: &GameSession, status: GameStatus) -> Self {
        let game_status = if session.is_over() {
            GameStatus::Ended
        } else {
            status
        };
        Self {
            board: *session.board(),
            current_player: session.current_player(),
            game_status,
            winner: session.winner(),
        }
    }

    /// Rebuilds a local session from a bridge snapshot.
    ///
    /// History is not part of the snapshot, so the result cannot be undone
    /// past this point.
    pub fn to_session(&self) -> GameSession {
        GameSession::from_position(self.board, self.current_player)
    }
}

/// Request body of `POST move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Move in `"D3"` notation.
    #[serde(rename = "move")]
    pub notation: String,
    pub player: Player,
}

impl MoveRequest {
    pub fn new(mv: Move, player: Player) -> Self {
        Self {
            notation: mv.to_string(),
            player,
        }
    }

    pub fn parse_move(&self) -> Result<Move, EngineError> {
        self.notation.parse()
    }
}

/// Response body of `GET status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BridgeStatus {
    pub python_connected: bool,
}

/// A remote game capability. Implementations may be HTTP clients, test
/// doubles or the in-process [`LocalBridge`].
pub trait GameBridge {
    fn get_board(&self) -> Result<BoardSnapshot, EngineError>;
    fn submit_move(&mut self, request: &MoveRequest) -> Result<BoardSnapshot, EngineError>;
    fn get_status(&self) -> Result<BridgeStatus, EngineError>;
}

/// Bridge implementation backed by a local [`GameSession`].
///
/// Requests are treated as untrusted: notation, colour and legality are all
/// checked before the session changes.
#[derive(Debug, Clone, Default)]
pub struct LocalBridge {
    session: GameSession,
    connected: bool,
}

impl LocalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: GameSession) -> Self {
        Self {
            session,
            connected: false,
        }
    }

    pub fn connect(&mut self) {
        info!("bridge peer connected");
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        info!("bridge peer disconnected");
        self.connected = false;
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn status(&self) -> GameStatus {
        if self.connected {
            GameStatus::Playing
        } else {
            GameStatus::Waiting
        }
    }
}

impl GameBridge for LocalBridge {
    fn get_board(&self) -> Result<BoardSnapshot, EngineError> {
        Ok(BoardSnapshot::from_session(&self.session, self.status()))
    }

    fn submit_move(&mut self, request: &MoveRequest) -> Result<BoardSnapshot, EngineError> {
        if !self.connected {
            return Err(EngineError::BridgeUnavailable);
        }
        let mv = request
            .parse_move()
            .inspect_err(|err| warn!(%err, "bridge move rejected"))?;
        self.session
            .submit_for(request.player, mv)
            .inspect_err(|err| warn!(%err, %mv, "bridge move rejected"))?;
        self.get_board()
    }

    fn get_status(&self) -> Result<BridgeStatus, EngineError> {
        Ok(BridgeStatus {
            python_connected: self.connected,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::board_from_rows;

    fn request(notation: &str, player: Player) -> MoveRequest {
        MoveRequest {
            notation: notation.to_string(),
            player,
        }
    }

    #[test]
    fn snapshot_matches_bridge_json_shape() {
        let snapshot = LocalBridge::new().get_board().unwrap();

        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["current_player"], "B");
        assert_eq!(value["game_status"], "waiting");
        assert_eq!(value["winner"], serde_json::Value::Null);
        assert_eq!(
            value["board"][3],
            json!([".", ".", ".", "W", "B", ".", ".", "."])
        );
        assert_eq!(
            value["board"][4],
            json!([".", ".", ".", "B", "W", ".", ".", "."])
        );
    }

    #[test]
    fn snapshot_parses_bridge_payload_without_optional_fields() {
        let mut rows = vec![json!([".", ".", ".", ".", ".", ".", ".", "."]); 8];
        rows[3] = json!([".", ".", ".", "W", "B", ".", ".", "."]);
        rows[4] = json!([".", ".", ".", "B", "W", ".", ".", "."]);
        let payload = json!({ "board": rows, "current_player": "W" });

        let snapshot: BoardSnapshot = serde_json::from_value(payload).unwrap();

        assert_eq!(snapshot.board, Board::new());
        assert_eq!(snapshot.current_player, Player::Light);
        assert_eq!(snapshot.game_status, GameStatus::Waiting);
        let session = snapshot.to_session();
        assert_eq!(session.current_player(), Player::Light);
        assert_eq!(session.valid_moves().len(), 4);
    }

    #[test]
    fn move_request_uses_letter_number_notation() {
        let body = MoveRequest::new(Move::new(2, 3).unwrap(), Player::Dark);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "move": "D3", "player": "B" })
        );
    }

    #[test]
    fn moves_are_refused_until_connected() {
        let mut bridge = LocalBridge::new();
        assert!(!bridge.get_status().unwrap().python_connected);

        assert!(matches!(
            bridge.submit_move(&request("D3", Player::Dark)),
            Err(EngineError::BridgeUnavailable)
        ));

        bridge.connect();
        let snapshot = bridge.submit_move(&request("D3", Player::Dark)).unwrap();
        assert_eq!(snapshot.current_player, Player::Light);
        assert_eq!(snapshot.game_status, GameStatus::Playing);
        assert!(bridge.get_status().unwrap().python_connected);
    }

    #[test]
    fn untrusted_requests_do_not_touch_the_session() {
        let mut bridge = LocalBridge::new();
        bridge.connect();

        assert!(matches!(
            bridge.submit_move(&request("Z9", Player::Dark)),
            Err(EngineError::InvalidNotation(_))
        ));
        assert!(matches!(
            bridge.submit_move(&request("D3", Player::Light)),
            Err(EngineError::WrongTurn { .. })
        ));
        assert!(matches!(
            bridge.submit_move(&request("A1", Player::Dark)),
            Err(EngineError::IllegalMove { .. })
        ));
        assert_eq!(bridge.session(), &GameSession::new());
    }

    #[test]
    fn finished_game_reports_ended_with_winner() {
        let board = board_from_rows([
            ".BWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
            "WWWWWWWW",
        ]);
        let mut bridge = LocalBridge::with_session(GameSession::from_position(board, Player::Dark));
        bridge.connect();

        // Dark is stuck, so the bridge already reports light on turn.
        assert_eq!(bridge.get_board().unwrap().current_player, Player::Light);

        let snapshot = bridge.submit_move(&request("A1", Player::Light)).unwrap();

        assert_eq!(snapshot.game_status, GameStatus::Ended);
        assert_eq!(snapshot.winner, Some(GameOutcome::Winner(Player::Light)));
        assert_eq!(serde_json::to_value(&snapshot).unwrap()["winner"], "W");
        assert!(matches!(
            bridge.submit_move(&request("A1", Player::Light)),
            Err(EngineError::GameOver)
        ));
    }
}
