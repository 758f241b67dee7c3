//! Error types for the session layer.

use alice_protocol::SessionId;
use alice_transport::ConnectionId;

/// Errors that can occur during session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session does not exist (never did, or was already removed).
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The session already has both players.
    #[error("session {0} is full")]
    SessionFull(SessionId),

    /// The connection is not bound to any session.
    #[error("{0} is not in a session")]
    NoBinding(ConnectionId),

    /// The connection is already bound to a session.
    #[error("{0} is already in session {1}")]
    AlreadyBound(ConnectionId, SessionId),

    /// The session is not in a state that accepts moves.
    #[error("session {0} is not active")]
    NotActive(SessionId),

    /// A move named a session other than the sender's own.
    #[error("move for session {requested} from a player of session {bound}")]
    GameMismatch {
        requested: SessionId,
        bound: SessionId,
    },
}
