//! Two-peer play. Peers exchange moves, never boards: each side replays the
//! other's move through its own [`GameSession`] so both stay identical.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::game::{GameSession, MoveOutcome};
use crate::types::{Move, Player};

/// The only record that crosses the wire between peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMessage {
    #[serde(rename = "move")]
    pub mv: Move,
    pub player: Player,
    pub session_id: Uuid,
}

impl MoveMessage {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One side of a duo game.
#[derive(Debug, Clone)]
pub struct DuoPeer {
    session_id: Uuid,
    local: Player,
    session: GameSession,
}

impl DuoPeer {
    /// Opens a new lobby with a fresh session id.
    pub fn host(local: Player) -> Self {
        Self::join(Uuid::new_v4(), local)
    }

    pub fn join(session_id: Uuid, local: Player) -> Self {
        Self {
            session_id,
            local,
            session: GameSession::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn local_player(&self) -> Player {
        self.local
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_my_turn(&self) -> bool {
        !self.session.is_over() && self.session.current_player() == self.local
    }

    /// Plays a local move and returns the message to send to the other peer.
    pub fn play_local(&mut self, mv: Move) -> Result<MoveMessage, EngineError> {
        self.session.submit_for(self.local, mv)?;
        Ok(MoveMessage {
            mv,
            player: self.local,
            session_id: self.session_id,
        })
    }

    /// Replays a move received from the other peer.
    pub fn apply_remote(&mut self, message: &MoveMessage) -> Result<MoveOutcome, EngineError> {
        if message.session_id != self.session_id {
            warn!(
                expected = %self.session_id,
                got = %message.session_id,
                "dropping move for another session"
            );
            return Err(EngineError::SessionMismatch);
        }
        if message.player == self.local {
            warn!(player = %message.player, "remote peer sent a move for our colour");
            return Err(EngineError::WrongTurn {
                expected: !self.local,
                got: message.player,
            });
        }

        self.session
            .submit_for(message.player, message.mv)
            .inspect(|outcome| debug!(mv = %outcome.ply.mv, "replayed remote move"))
            .inspect_err(|err| warn!(%err, mv = %message.mv, "rejected remote move"))
    }

    /// Waits for the next message on `channel` and replays it.
    pub async fn receive_next(&mut self, channel: &mut DuoChannel) -> Result<MoveOutcome, EngineError> {
        let message = channel.recv().await.ok_or(EngineError::ChannelClosed)?;
        self.apply_remote(&message)
    }
}

/// One endpoint of an in-process link between two peers.
#[derive(Debug)]
pub struct DuoChannel {
    tx: UnboundedSender<MoveMessage>,
    rx: UnboundedReceiver<MoveMessage>,
}

/// Creates two connected endpoints.
pub fn duo_link() -> (DuoChannel, DuoChannel) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (
        DuoChannel { tx: a_tx, rx: a_rx },
        DuoChannel { tx: b_tx, rx: b_rx },
    )
}

impl DuoChannel {
    pub fn send(&self, message: MoveMessage) -> Result<(), EngineError> {
        self.tx.send(message).map_err(|_| EngineError::ChannelClosed)
    }

    pub async fn recv(&mut self) -> Option<MoveMessage> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<MoveMessage> {
        self.rx.try_recv().ok()
    }
}
