//! # Alice Chess server
//!
//! Pairs anonymous WebSocket connections into two-player Alice Chess
//! games, keeps both players' boards in sync, and enforces turn order.
//!
//! The game core is [`Lobby`]: a synchronous controller mapping one inbound
//! event to the outbound messages it causes. [`Server`] wraps it in a
//! WebSocket accept loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alice::prelude::*;
//!
//! # async fn start() -> Result<(), AliceError> {
//! let server = Server::builder().bind("0.0.0.0:3000").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod lobby;
mod server;

pub use error::{AliceError, MoveRejection};
pub use lobby::{Inbound, Lobby, Outbound};
pub use server::{Server, ServerBuilder, DEFAULT_BIND_ADDR};

/// Everything needed to run a server or drive a [`Lobby`] directly.
pub mod prelude {
    pub use crate::{AliceError, Inbound, Lobby, Outbound, Server, ServerBuilder};
    pub use alice_board::{BoardPair, Color, Move, RuleSet, Square};
    pub use alice_protocol::{ClientMessage, ServerMessage, SessionId};
    pub use alice_transport::ConnectionId;
}
