//! `Server` builder and accept loop.
//!
//! This is the entry point for running an Alice Chess server. It ties the
//! layers together: transport → protocol → lobby.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use alice_board::RuleSet;
use alice_protocol::{JsonCodec, ServerMessage};
use alice_transport::{ConnectionId, Transport, WebSocketTransport};
use tokio::sync::{mpsc, Mutex};

use crate::handler::handle_connection;
use crate::{AliceError, Inbound, Lobby};

/// Address used when the builder is not given one.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Channel feeding one connection's writer task.
pub(crate) type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Lock order
/// is always `lobby` then `outboxes`.
pub(crate) struct ServerState {
    pub(crate) lobby: Mutex<Lobby>,
    pub(crate) outboxes: Mutex<HashMap<ConnectionId, Outbox>>,
    pub(crate) codec: JsonCodec,
}

impl ServerState {
    fn new(rules: RuleSet) -> Self {
        Self {
            lobby: Mutex::new(Lobby::new(rules)),
            outboxes: Mutex::new(HashMap::new()),
            codec: JsonCodec,
        }
    }

    /// Runs one event through the lobby and queues the results.
    ///
    /// The lobby lock is held until every message is queued, so two
    /// dispatches can't deliver out of order. Queuing is a channel push,
    /// never socket I/O.
    pub(crate) async fn dispatch(&self, conn: ConnectionId, event: Inbound) {
        let mut lobby = self.lobby.lock().await;
        let outbound = lobby.handle(conn, event);
        let outboxes = self.outboxes.lock().await;
        for msg in outbound {
            match outboxes.get(&msg.to) {
                Some(outbox) => {
                    if outbox.send(msg.message).is_err() {
                        tracing::debug!(conn_id = %msg.to, "outbox closed, message dropped");
                    }
                }
                None => tracing::debug!(conn_id = %msg.to, "no outbox, message dropped"),
            }
        }
    }
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use alice::prelude::*;
///
/// # async fn start() -> Result<(), AliceError> {
/// let server = ServerBuilder::new()
///     .bind("0.0.0.0:3000")
///     .rules(RuleSet::Basic)
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ServerBuilder {
    bind_addr: String,
    rules: RuleSet,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            rules: RuleSet::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Sets the rule set moves are validated with.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Binds the listener. The server does not accept until [`Server::run`].
    pub async fn build(self) -> Result<Server, AliceError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        tracing::info!(rules = %self.rules, "server configured");
        Ok(Server {
            transport,
            state: Arc::new(ServerState::new(self.rules)),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Alice Chess server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl Server {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns a handler task for each accepted connection. A failed accept
    /// (for example a bad WebSocket handshake) is logged and the loop goes
    /// on. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), AliceError> {
        match self.local_addr() {
            Ok(addr) => tracing::info!(%addr, "server is running on port {}", addr.port()),
            Err(e) => tracing::warn!(error = %e, "server is running, address unknown"),
        }

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
