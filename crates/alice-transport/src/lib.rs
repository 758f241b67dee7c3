//! Transport abstraction layer for the Alice Chess server.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the network protocol carrying game messages, plus the opaque
//! [`ConnectionId`] every accepted channel is tagged with.
//!
//! The game core never touches a socket. It only sees `ConnectionId`s,
//! which keeps the session data model independent of whatever library
//! owns the actual connection object.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

use uuid::Uuid;

/// Opaque identifier for a connection.
///
/// Minted exactly once, when the transport accepts a channel, and valid
/// only for that channel's lifetime. A reconnecting client gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mints a fresh, globally unique connection id (UUID v4).
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID. Mostly useful in tests that need stable ids.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that can send and receive messages.
///
/// Sending and receiving must be usable concurrently: one task reads
/// client messages while another drains the connection's outbox.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one message to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_mint_is_unique() {
        let a = ConnectionId::mint();
        let b = ConnectionId::mint();
        assert_ne!(a, b);
    }

    #[test]
    fn test_connection_id_from_uuid_is_stable() {
        let raw = Uuid::new_v4();
        assert_eq!(ConnectionId::from_uuid(raw), ConnectionId::from_uuid(raw));
        assert_ne!(ConnectionId::from_uuid(raw), ConnectionId::mint());
    }

    #[test]
    fn test_connection_id_display() {
        let raw = Uuid::nil();
        let id = ConnectionId::from_uuid(raw);
        assert_eq!(
            id.to_string(),
            "conn-00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let alice = ConnectionId::mint();
        let bob = ConnectionId::mint();
        let mut map = HashMap::new();
        map.insert(alice, "alice");
        map.insert(bob, "bob");
        assert_eq!(map[&alice], "alice");
        assert_eq!(map[&bob], "bob");
    }
}
