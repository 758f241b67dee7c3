//! Reasons a move can be rejected.

/// Why the move engine refused a move.
///
/// Every variant leaves the position untouched. Clients only ever see the
/// generic "Invalid move" text; the specific reason goes to the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    /// A board, row, or column index is outside the board pair.
    #[error("coordinates are off the board")]
    OutOfBounds,

    /// There is no piece on the source square.
    #[error("no piece on the source square")]
    EmptySource,

    /// The piece on the source square belongs to the opponent.
    #[error("piece belongs to the opponent")]
    NotYourPiece,

    /// The target square on the source board holds a friendly piece.
    #[error("target square holds a friendly piece")]
    OwnPieceAtTarget,

    /// The destination is not on the other board.
    #[error("piece must transfer to the other board")]
    WrongBoard,

    /// The square the piece would transfer to is occupied.
    #[error("transfer square on the other board is occupied")]
    TransferSquareOccupied,

    /// Source and destination are the same row and column.
    #[error("piece did not move")]
    NoMovement,

    /// The piece cannot move that way.
    #[error("piece cannot move that way")]
    IllegalGeometry,

    /// Another piece is in the way.
    #[error("path is blocked")]
    PathBlocked,
}
