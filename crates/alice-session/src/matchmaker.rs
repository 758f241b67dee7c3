//! Matchmaking: seat a joiner in the oldest waiting session, or open one.

use alice_board::Color;
use alice_protocol::SessionId;
use alice_transport::ConnectionId;

use crate::{SessionError, SessionRegistry};

/// Outcome of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub session_id: SessionId,
    pub role: Color,
    /// `true` when this join filled the session and the game begins.
    pub started: bool,
}

/// FIFO matchmaking over a [`SessionRegistry`].
///
/// The oldest waiting session takes the joiner. If there is none, a new
/// waiting session is created. The exclusive borrow of the registry makes the capacity check
/// and the seat assignment one atomic step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matchmaker;

impl Matchmaker {
    /// Pairs `conn` with a waiting opponent or opens a new session.
    ///
    /// # Errors
    /// [`SessionError::AlreadyBound`] if `conn` is already in a session.
    pub fn find_or_create(
        registry: &mut SessionRegistry,
        conn: ConnectionId,
    ) -> Result<Pairing, SessionError> {
        if let Some(session_id) = registry.first_waiting() {
            match registry.join_waiting(session_id, conn) {
                Ok(role) => {
                    return Ok(Pairing {
                        session_id,
                        role,
                        started: true,
                    });
                }
                Err(err @ SessionError::AlreadyBound(..)) => return Err(err),
                Err(err) => {
                    // The waiting queue only holds joinable sessions.
                    tracing::warn!(
                        %session_id,
                        conn_id = %conn,
                        error = %err,
                        "waiting session refused a join"
                    );
                }
            }
        }

        let session_id = registry.register_waiting(conn)?;
        Ok(Pairing {
            session_id,
            role: Color::White,
            started: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionState;

    #[test]
    fn test_first_joiner_waits_as_white() {
        let mut registry = SessionRegistry::new();
        let pairing = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();

        assert_eq!(pairing.role, Color::White);
        assert!(!pairing.started);
        assert_eq!(registry.waiting_count(), 1);
    }

    #[test]
    fn test_second_joiner_starts_the_game_as_black() {
        let mut registry = SessionRegistry::new();
        let first = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();
        let second = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();

        assert_eq!(second.session_id, first.session_id);
        assert_eq!(second.role, Color::Black);
        assert!(second.started);
        assert_eq!(
            registry.session(first.session_id).unwrap().state(),
            SessionState::Active
        );
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn test_third_joiner_opens_a_new_session() {
        let mut registry = SessionRegistry::new();
        let a = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();
        Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();
        let c = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();

        assert_ne!(c.session_id, a.session_id);
        assert_eq!(c.role, Color::White);
        assert_eq!(registry.session_count(), 2);
    }

    #[test]
    fn test_pairs_with_oldest_waiting_session() {
        let mut registry = SessionRegistry::new();
        let older = registry.register_waiting(ConnectionId::mint()).unwrap();
        let _newer = registry.register_waiting(ConnectionId::mint()).unwrap();

        let pairing = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();

        assert_eq!(pairing.session_id, older);
    }

    #[test]
    fn test_pairs_with_next_waiting_after_oldest_leaves() {
        let mut registry = SessionRegistry::new();
        let older = registry.register_waiting(ConnectionId::mint()).unwrap();
        let newer = registry.register_waiting(ConnectionId::mint()).unwrap();
        registry.remove_session(older);

        let pairing = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();

        assert_eq!(pairing.session_id, newer);
        assert!(pairing.started);
        assert_eq!(registry.waiting_count(), 0);
    }

    #[test]
    fn test_bound_connection_is_refused() {
        let mut registry = SessionRegistry::new();
        let conn = ConnectionId::mint();
        let first = Matchmaker::find_or_create(&mut registry, conn).unwrap();

        let err = Matchmaker::find_or_create(&mut registry, conn).unwrap_err();

        assert_eq!(err, SessionError::AlreadyBound(conn, first.session_id));
        assert_eq!(registry.session_count(), 1);
        assert_eq!(registry.waiting_count(), 1);
    }
}
