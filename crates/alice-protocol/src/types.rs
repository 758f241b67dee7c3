//! Wire types: every structure that travels between browser and server.
//!
//! One JSON object per message, discriminated by a `type` field:
//!
//! ```text
//! client → server   { "type": "join" }
//!                   { "type": "move", "gameId": "…", "from": {…}, "to": {…} }
//! server → client   { "type": "assignRole", "role": "white", "gameId": "…" }
//!                   { "type": "startGame", "board": [[…],[…]], "currentTurn": "white" }
//!                   { "type": "updateBoard", "board": [[…],[…]], "currentTurn": "black" }
//!                   { "type": "error", "message": "Not your turn" }
//!                   { "type": "opponentDisconnected" }
//! ```

use std::fmt;

use alice_board::{BoardPair, Color, Square};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a game session (the `gameId` on the wire).
///
/// A newtype around a v4 UUID so a session id can't be mixed up with a
/// connection id. `#[serde(transparent)]` makes it a plain string in JSON.
/// Clients treat it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mints a fresh session id.
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, and
/// `rename_all = "camelCase"` turns `Move` into `"move"`.
///
/// `#[serde(other)]` on [`ClientMessage::Unknown`] catches any `type` we
/// don't recognize, so an unknown kind decodes successfully and can be
/// logged and ignored instead of failing as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// "Find me an opponent."
    Join,

    /// "Move the piece at `from` to `to` in game `game_id`."
    Move {
        #[serde(rename = "gameId")]
        game_id: SessionId,
        from: Square,
        to: Square,
    },

    /// Any other `type` value.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Short name of the message kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Move { .. } => "move",
            Self::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// Messages the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// "You are `role` in game `game_id`." Sent to each joiner.
    AssignRole {
        role: Color,
        #[serde(rename = "gameId")]
        game_id: SessionId,
    },

    /// "Both players are here." Carries the opening position.
    StartGame {
        board: BoardPair,
        #[serde(rename = "currentTurn")]
        current_turn: Color,
    },

    /// "A move was played." Carries the full position after the move.
    UpdateBoard {
        board: BoardPair,
        #[serde(rename = "currentTurn")]
        current_turn: Color,
    },

    /// "Your request was rejected." Only ever sent to the offender.
    Error { message: String },

    /// "Your opponent left; the game is over."
    OpponentDisconnected,
}

impl ServerMessage {
    /// Convenience constructor for [`ServerMessage::Error`].
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
