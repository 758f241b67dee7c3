//! Wire protocol for the Alice Chess server.
//!
//! This crate defines the "language" that browsers and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`SessionId`]) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the session
//! layer (who is playing whom). It doesn't know about connections or
//! games, only how to serialize and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Lobby (session state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, ServerMessage, SessionId};
