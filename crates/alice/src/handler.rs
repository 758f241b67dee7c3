//! Per-connection handler: outbox writer, reader loop, close dispatch.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbox and spawn the writer task that drains it
//!   2. Loop: receive frames → decode → dispatch into the lobby
//!   3. On close, error, or EOF: dispatch `Closed` once and drop the outbox

use std::sync::Arc;

use alice_protocol::{ClientMessage, Codec, JsonCodec, ServerMessage};
use alice_transport::{Connection, ConnectionId, TransportError, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::{AliceError, Inbound};

/// Drop guard that tears down the connection's session when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct CloseGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.dispatch(conn_id, Inbound::Closed).await;
            // Dropping the sender ends the writer task.
            state.outboxes.lock().await.remove(&conn_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), AliceError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (outbox, rx) = mpsc::unbounded_channel();
    state.outboxes.lock().await.insert(conn_id, outbox);
    let _guard = CloseGuard {
        conn_id,
        state: Arc::clone(&state),
    };
    let writer = Arc::clone(&conn);
    let codec = state.codec;
    tokio::spawn(async move {
        if let Err(e) = write_outbox(&*writer, rx, codec).await {
            tracing::debug!(conn_id = %writer.id(), error = %e, "writer stopped");
        }
        let _ = writer.close().await;
    });

    // A recv error returns early; _guard still dispatches Closed.
    while let Some(data) = conn.recv().await? {
        // A bad frame is dropped; the channel stays open.
        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode message");
                continue;
            }
        };

        tracing::trace!(%conn_id, kind = msg.kind(), "message received");
        state.dispatch(conn_id, Inbound::Message(msg)).await;
    }

    tracing::debug!(%conn_id, "connection closed cleanly");
    // _guard drops here → Closed is dispatched.
    Ok(())
}

/// Drains one connection's outbox to its socket until the outbox is
/// dropped. Stops at the first encode or send failure.
async fn write_outbox<C>(
    conn: &C,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    codec: JsonCodec,
) -> Result<(), AliceError>
where
    C: Connection<Error = TransportError>,
{
    while let Some(msg) = rx.recv().await {
        let bytes = codec.encode(&msg)?;
        conn.send(&bytes).await?;
    }
    Ok(())
}
