//! Unified error type for the Alice Chess server.

use alice_board::IllegalMove;
use alice_protocol::ProtocolError;
use alice_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum AliceError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Why a move from a seated player was refused.
///
/// Unlike a `SessionError` on the move path, which is dropped silently,
/// a rejection is reported back to the mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    /// The mover's color is not the one on move.
    #[error("not the mover's turn")]
    WrongTurn,

    /// The move engine refused the move.
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
}

impl MoveRejection {
    /// The text sent to the client in the `error` message.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::WrongTurn => "Not your turn",
            Self::Illegal(_) => "Invalid move",
        }
    }
}
