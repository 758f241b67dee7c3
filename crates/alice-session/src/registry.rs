//! Session registry: owns every session and every participant binding.

use std::collections::{HashMap, VecDeque};

use alice_board::Color;
use alice_protocol::SessionId;
use alice_transport::ConnectionId;

use crate::{ParticipantBinding, Session, SessionError};

/// All live sessions, plus the index from connection to session.
///
/// Two invariants hold after every call:
///
/// - a connection is bound to at most one session;
/// - a binding exists exactly for the seated players of live sessions.
///
/// The registry is a plain struct with no interior locking. Callers that
/// share it across tasks wrap it (or its owner) in a mutex, which makes
/// every `&mut self` call atomic with respect to the others.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Live sessions, keyed by id.
    sessions: HashMap<SessionId, Session>,

    /// Maps each seated connection to its session and color.
    bindings: HashMap<ConnectionId, ParticipantBinding>,

    /// Waiting sessions, oldest first.
    waiting: VecDeque<SessionId>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a waiting session with `conn` seated as white.
    pub fn register_waiting(&mut self, conn: ConnectionId) -> Result<SessionId, SessionError> {
        self.ensure_unbound(conn)?;

        let id = SessionId::mint();
        self.sessions.insert(id, Session::new(id, conn));
        self.bindings.insert(
            conn,
            ParticipantBinding {
                session_id: id,
                role: Color::White,
            },
        );
        self.waiting.push_back(id);
        tracing::info!(session_id = %id, conn_id = %conn, "session created");
        Ok(id)
    }

    /// Seats `conn` as black in the waiting session `id`, activating it.
    pub fn join_waiting(
        &mut self,
        id: SessionId,
        conn: ConnectionId,
    ) -> Result<Color, SessionError> {
        self.ensure_unbound(conn)?;

        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::SessionNotFound(id))?;
        session.seat_black(conn)?;

        self.waiting.retain(|w| *w != id);
        self.bindings.insert(
            conn,
            ParticipantBinding {
                session_id: id,
                role: Color::Black,
            },
        );
        tracing::info!(session_id = %id, conn_id = %conn, "session started");
        Ok(Color::Black)
    }

    /// The binding of `conn`, or [`SessionError::NoBinding`].
    pub fn lookup_binding(&self, conn: ConnectionId) -> Result<ParticipantBinding, SessionError> {
        self.bindings
            .get(&conn)
            .copied()
            .ok_or(SessionError::NoBinding(conn))
    }

    /// Removes session `id` and every binding pointing at it.
    ///
    /// Returns the removed session, marked terminated, so the caller can
    /// find who is left to notify. Removing an absent id returns `None`.
    pub fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        let mut session = self.sessions.remove(&id)?;
        for conn in session.participants() {
            self.bindings.remove(&conn);
        }
        self.waiting.retain(|w| *w != id);
        session.terminate();
        tracing::info!(
            session_id = %id,
            moves_played = session.moves_played(),
            "session terminated"
        );
        Some(session)
    }

    /// The oldest session still waiting for a second player.
    pub fn first_waiting(&self) -> Option<SessionId> {
        self.waiting.front().copied()
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Number of live sessions, waiting or active.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of sessions waiting for a second player.
    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    /// Number of bound connections.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    fn ensure_unbound(&self, conn: ConnectionId) -> Result<(), SessionError> {
        match self.bindings.get(&conn) {
            Some(binding) => Err(SessionError::AlreadyBound(conn, binding.session_id)),
            None => Ok(()),
        }
    }
}
