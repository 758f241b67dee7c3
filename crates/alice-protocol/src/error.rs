//! Error types for the protocol layer.
//!
//! Each crate defines its own error enum. When you see a `ProtocolError`,
//! the problem is in turning messages into bytes or back, not in the
//! network or in game state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields such as
    /// `gameId` on a move, or negative coordinates.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
