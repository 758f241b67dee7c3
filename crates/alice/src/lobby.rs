//! The session lifecycle controller.
//!
//! [`Lobby::handle`] is the only entry point: one inbound event from one
//! connection in, the list of messages to send out. It never touches a
//! socket, so the whole join/start/move/disconnect flow is testable with
//! plain values.
//!
//! ```text
//! join            → Matchmaker      → assignRole (+ startGame × 2)
//! move            → Session::play   → updateBoard × 2  |  error to mover
//! channel closed  → remove_session  → opponentDisconnected to survivor
//! ```

use alice_board::{Color, Move, RuleSet};
use alice_protocol::{ClientMessage, ServerMessage, SessionId};
use alice_session::{Matchmaker, Session, SessionError, SessionRegistry};
use alice_transport::ConnectionId;

use crate::MoveRejection;

/// Something that happened on one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A decoded client message.
    Message(ClientMessage),
    /// The channel closed (clean close, error, or EOF).
    Closed,
}

/// A message addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: ConnectionId,
    pub message: ServerMessage,
}

impl Outbound {
    pub fn new(to: ConnectionId, message: ServerMessage) -> Self {
        Self { to, message }
    }
}

/// Owns the session registry and turns inbound events into outbound
/// messages.
///
/// Every call to [`handle`](Self::handle) runs to completion against
/// `&mut self`, so one dispatch never observes another half-done. The
/// server keeps the lobby behind a single async mutex.
#[derive(Debug, Default)]
pub struct Lobby {
    registry: SessionRegistry,
    rules: RuleSet,
}

impl Lobby {
    /// An empty lobby validating moves with `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            registry: SessionRegistry::new(),
            rules,
        }
    }

    /// Dispatches one event from `conn`.
    ///
    /// The returned messages are in delivery order. Errors never escape:
    /// user-facing ones become `error` messages for `conn`, the rest are
    /// logged and produce nothing.
    pub fn handle(&mut self, conn: ConnectionId, event: Inbound) -> Vec<Outbound> {
        match event {
            Inbound::Message(ClientMessage::Join) => self.join(conn),
            Inbound::Message(ClientMessage::Move { game_id, from, to }) => {
                self.play(conn, game_id, Move::new(from, to))
            }
            Inbound::Message(ClientMessage::Unknown) => {
                tracing::debug!(conn_id = %conn, "ignoring unknown message type");
                Vec::new()
            }
            Inbound::Closed => self.disconnect(conn),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.registry.session_count()
    }

    /// Number of sessions waiting for an opponent.
    pub fn waiting_count(&self) -> usize {
        self.registry.waiting_count()
    }

    // -----------------------------------------------------------------
    // join
    // -----------------------------------------------------------------

    fn join(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        let pairing = match Matchmaker::find_or_create(&mut self.registry, conn) {
            Ok(pairing) => pairing,
            Err(SessionError::AlreadyBound(_, session_id)) => {
                tracing::debug!(conn_id = %conn, %session_id, "join from a bound connection");
                return vec![Outbound::new(conn, ServerMessage::error("Already in a game"))];
            }
            Err(err) => {
                tracing::warn!(conn_id = %conn, error = %err, "matchmaking failed");
                return Vec::new();
            }
        };

        let mut out = vec![Outbound::new(
            conn,
            ServerMessage::AssignRole {
                role: pairing.role,
                game_id: pairing.session_id,
            },
        )];

        if pairing.started {
            if let Some(session) = self.registry.session(pairing.session_id) {
                out.extend(session.participants().map(|p| {
                    Outbound::new(
                        p,
                        ServerMessage::StartGame {
                            board: session.board().clone(),
                            current_turn: session.turn(),
                        },
                    )
                }));
            }
        }
        out
    }

    // -----------------------------------------------------------------
    // move
    // -----------------------------------------------------------------

    fn play(&mut self, conn: ConnectionId, game_id: SessionId, mv: Move) -> Vec<Outbound> {
        let rules = self.rules;
        let (session, role) = match self.active_session(conn, game_id) {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(conn_id = %conn, %game_id, error = %err, "move dropped");
                return Vec::new();
            }
        };

        match try_move(session, role, &mv, rules) {
            Ok(()) => {
                tracing::debug!(%game_id, %role, %mv, "move applied");
                session
                    .participants()
                    .map(|p| {
                        Outbound::new(
                            p,
                            ServerMessage::UpdateBoard {
                                board: session.board().clone(),
                                current_turn: session.turn(),
                            },
                        )
                    })
                    .collect()
            }
            Err(rejection) => {
                tracing::debug!(%game_id, %role, %mv, reason = %rejection, "move rejected");
                vec![Outbound::new(conn, ServerMessage::error(rejection.user_message()))]
            }
        }
    }

    /// The sender's session, if it is the one named and accepts moves.
    fn active_session(
        &mut self,
        conn: ConnectionId,
        game_id: SessionId,
    ) -> Result<(&mut Session, Color), SessionError> {
        let binding = self.registry.lookup_binding(conn)?;
        if binding.session_id != game_id {
            return Err(SessionError::GameMismatch {
                requested: game_id,
                bound: binding.session_id,
            });
        }
        let session = self
            .registry
            .session_mut(game_id)
            .ok_or(SessionError::SessionNotFound(game_id))?;
        if !session.state().accepts_moves() {
            return Err(SessionError::NotActive(game_id));
        }
        Ok((session, binding.role))
    }

    // -----------------------------------------------------------------
    // disconnect
    // -----------------------------------------------------------------

    fn disconnect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        let binding = match self.registry.lookup_binding(conn) {
            Ok(binding) => binding,
            Err(_) => {
                tracing::debug!(conn_id = %conn, "unbound connection closed");
                return Vec::new();
            }
        };

        self.registry
            .remove_session(binding.session_id)
            .and_then(|session| session.opponent_of(conn))
            .map(|survivor| Outbound::new(survivor, ServerMessage::OpponentDisconnected))
            .into_iter()
            .collect()
    }
}

/// Turn check, then the engine. The session is untouched on rejection.
fn try_move(
    session: &mut Session,
    role: Color,
    mv: &Move,
    rules: RuleSet,
) -> Result<(), MoveRejection> {
    if session.turn() != role {
        return Err(MoveRejection::WrongTurn);
    }
    session.play(mv, rules)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use alice_board::{BoardPair, Piece, PieceKind, Square};

    use super::*;

    fn join(lobby: &mut Lobby, conn: ConnectionId) -> Vec<Outbound> {
        lobby.handle(conn, Inbound::Message(ClientMessage::Join))
    }

    fn send_move(
        lobby: &mut Lobby,
        conn: ConnectionId,
        game_id: SessionId,
        from: Square,
        to: Square,
    ) -> Vec<Outbound> {
        lobby.handle(conn, Inbound::Message(ClientMessage::Move { game_id, from, to }))
    }

    /// Two joins, returning (white, black, game id).
    fn started(lobby: &mut Lobby) -> (ConnectionId, ConnectionId, SessionId) {
        let white = ConnectionId::mint();
        let black = ConnectionId::mint();
        let out = join(lobby, white);
        let game_id = match &out[0].message {
            ServerMessage::AssignRole { game_id, .. } => *game_id,
            other => panic!("expected assignRole, got {other:?}"),
        };
        join(lobby, black);
        (white, black, game_id)
    }

    fn board_of(lobby: &Lobby, id: SessionId) -> BoardPair {
        lobby.registry().session(id).unwrap().board().clone()
    }

    const E2: Square = Square::new(0, 6, 4);
    const E4: Square = Square::new(0, 4, 4);

    // =====================================================================
    // join
    // =====================================================================

    #[test]
    fn test_first_join_assigns_white_and_waits() {
        let mut lobby = Lobby::default();
        let conn = ConnectionId::mint();

        let out = join(&mut lobby, conn);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, conn);
        assert!(matches!(
            out[0].message,
            ServerMessage::AssignRole { role: Color::White, .. }
        ));
        assert_eq!(lobby.waiting_count(), 1);
    }

    #[test]
    fn test_second_join_assigns_black_then_starts_both() {
        let mut lobby = Lobby::default();
        let white = ConnectionId::mint();
        let black = ConnectionId::mint();
        let first = join(&mut lobby, white);
        let ServerMessage::AssignRole { game_id, .. } = first[0].message else {
            panic!("expected assignRole");
        };

        let out = join(&mut lobby, black);

        let start = ServerMessage::StartGame {
            board: BoardPair::initial(),
            current_turn: Color::White,
        };
        assert_eq!(
            out,
            vec![
                Outbound::new(black, ServerMessage::AssignRole { role: Color::Black, game_id }),
                Outbound::new(white, start.clone()),
                Outbound::new(black, start),
            ]
        );
        assert_eq!(lobby.session_count(), 1);
        assert_eq!(lobby.waiting_count(), 0);
    }

    #[test]
    fn test_join_when_already_in_a_game_is_an_error() {
        let mut lobby = Lobby::default();
        let (white, _, _) = started(&mut lobby);

        let out = join(&mut lobby, white);

        assert_eq!(
            out,
            vec![Outbound::new(white, ServerMessage::error("Already in a game"))]
        );
        assert_eq!(lobby.session_count(), 1);
    }

    #[test]
    fn test_third_joiner_gets_a_new_session() {
        let mut lobby = Lobby::default();
        let (_, _, first_game) = started(&mut lobby);
        let third = ConnectionId::mint();

        let out = join(&mut lobby, third);

        let ServerMessage::AssignRole { role, game_id } = out[0].message else {
            panic!("expected assignRole");
        };
        assert_eq!(role, Color::White);
        assert_ne!(game_id, first_game);
        assert_eq!(lobby.session_count(), 2);
    }

    // =====================================================================
    // move
    // =====================================================================

    #[test]
    fn test_valid_move_broadcasts_update_to_both() {
        let mut lobby = Lobby::default();
        let (white, black, game_id) = started(&mut lobby);

        let out = send_move(&mut lobby, white, game_id, E2, E4);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].to, white);
        assert_eq!(out[1].to, black);
        assert_eq!(out[0].message, out[1].message);
        let ServerMessage::UpdateBoard { board, current_turn } = &out[0].message else {
            panic!("expected updateBoard");
        };
        assert_eq!(*current_turn, Color::Black);
        assert_eq!(board.piece_at(E2), None);
        assert_eq!(board.piece_at(E4), Some(Piece::new(Color::White, PieceKind::Pawn)));
    }

    #[test]
    fn test_wrong_turn_is_reported_to_mover_only() {
        let mut lobby = Lobby::default();
        let (_, black, game_id) = started(&mut lobby);
        let before = board_of(&lobby, game_id);

        let out = send_move(
            &mut lobby,
            black,
            game_id,
            Square::new(0, 1, 4),
            Square::new(0, 3, 4),
        );

        assert_eq!(out, vec![Outbound::new(black, ServerMessage::error("Not your turn"))]);
        assert_eq!(board_of(&lobby, game_id), before);
    }

    #[test]
    fn test_empty_source_is_invalid_move_to_mover_only() {
        let mut lobby = Lobby::default();
        let (white, _, game_id) = started(&mut lobby);
        let before = board_of(&lobby, game_id);

        let out = send_move(&mut lobby, white, game_id, Square::new(0, 4, 4), Square::new(0, 3, 4));

        assert_eq!(out, vec![Outbound::new(white, ServerMessage::error("Invalid move"))]);
        assert_eq!(board_of(&lobby, game_id), before);
        assert_eq!(lobby.registry().session(game_id).unwrap().turn(), Color::White);
    }

    #[test]
    fn test_out_of_range_coordinates_are_invalid_move() {
        let mut lobby = Lobby::default();
        let (white, _, game_id) = started(&mut lobby);

        let out = send_move(&mut lobby, white, game_id, E2, Square::new(0, 9, 4));
        assert_eq!(out, vec![Outbound::new(white, ServerMessage::error("Invalid move"))]);

        let out = send_move(&mut lobby, white, game_id, E2, Square::new(2, 4, 4));
        assert_eq!(out, vec![Outbound::new(white, ServerMessage::error("Invalid move"))]);
    }

    #[test]
    fn test_turns_alternate() {
        let mut lobby = Lobby::default();
        let (white, black, game_id) = started(&mut lobby);

        send_move(&mut lobby, white, game_id, E2, E4);
        let again = send_move(&mut lobby, white, game_id, E4, Square::new(0, 3, 4));
        assert_eq!(again, vec![Outbound::new(white, ServerMessage::error("Not your turn"))]);

        let (e7, e5) = (Square::new(0, 1, 4), Square::new(0, 3, 4));
        let reply = send_move(&mut lobby, black, game_id, e7, e5);
        assert_eq!(reply.len(), 2);
        assert_eq!(lobby.registry().session(game_id).unwrap().moves_played(), 2);
    }

    #[test]
    fn test_basic_rules_take_board_indices_verbatim() {
        let mut lobby = Lobby::default();
        let (white, _, game_id) = started(&mut lobby);
        let target = Square::new(1, 4, 4);

        send_move(&mut lobby, white, game_id, E2, target);

        let board = board_of(&lobby, game_id);
        assert_eq!(board.piece_at(target), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(board.piece_at(E4), None);
    }

    #[test]
    fn test_alice_rules_reject_same_board_move() {
        let mut lobby = Lobby::new(RuleSet::Alice);
        let (white, black, game_id) = started(&mut lobby);

        let out = send_move(&mut lobby, white, game_id, E2, E4);
        assert_eq!(out, vec![Outbound::new(white, ServerMessage::error("Invalid move"))]);

        let out = send_move(&mut lobby, white, game_id, E2, Square::new(1, 4, 4));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].to, black);
    }

    #[test]
    fn test_move_with_foreign_game_id_is_ignored() {
        let mut lobby = Lobby::default();
        let (white, _, game_id) = started(&mut lobby);
        let (_, _, other_game) = started(&mut lobby);
        let before = board_of(&lobby, other_game);

        let out = send_move(&mut lobby, white, other_game, E2, E4);

        assert!(out.is_empty());
        assert_eq!(board_of(&lobby, other_game), before);
        assert_eq!(board_of(&lobby, game_id), BoardPair::initial());
    }

    #[test]
    fn test_move_in_waiting_session_is_ignored() {
        let mut lobby = Lobby::default();
        let white = ConnectionId::mint();
        let out = join(&mut lobby, white);
        let ServerMessage::AssignRole { game_id, .. } = out[0].message else {
            panic!("expected assignRole");
        };

        let out = send_move(&mut lobby, white, game_id, E2, E4);

        assert!(out.is_empty());
        assert_eq!(board_of(&lobby, game_id), BoardPair::initial());
    }

    #[test]
    fn test_move_from_unbound_connection_is_ignored() {
        let mut lobby = Lobby::default();
        let (_, _, game_id) = started(&mut lobby);

        let out = send_move(&mut lobby, ConnectionId::mint(), game_id, E2, E4);

        assert!(out.is_empty());
        assert_eq!(board_of(&lobby, game_id), BoardPair::initial());
    }

    #[test]
    fn test_unknown_message_does_nothing() {
        let mut lobby = Lobby::default();
        let out = lobby.handle(ConnectionId::mint(), Inbound::Message(ClientMessage::Unknown));
        assert!(out.is_empty());
        assert_eq!(lobby.session_count(), 0);
    }

    // =====================================================================
    // disconnect
    // =====================================================================

    #[test]
    fn test_disconnect_notifies_survivor_once_and_removes_session() {
        let mut lobby = Lobby::default();
        let (white, black, game_id) = started(&mut lobby);

        let out = lobby.handle(white, Inbound::Closed);

        assert_eq!(out, vec![Outbound::new(black, ServerMessage::OpponentDisconnected)]);
        assert!(lobby.registry().session(game_id).is_none());
        assert_eq!(lobby.session_count(), 0);

        // The survivor's binding is gone too.
        let out = send_move(&mut lobby, black, game_id, Square::new(0, 1, 4), Square::new(0, 3, 4));
        assert!(out.is_empty());
        assert!(lobby.handle(black, Inbound::Closed).is_empty());
    }

    #[test]
    fn test_disconnect_of_waiting_player_removes_session_silently() {
        let mut lobby = Lobby::default();
        let white = ConnectionId::mint();
        join(&mut lobby, white);

        let out = lobby.handle(white, Inbound::Closed);

        assert!(out.is_empty());
        assert_eq!(lobby.session_count(), 0);
        assert_eq!(lobby.waiting_count(), 0);

        // The next joiner starts fresh as white.
        let out = join(&mut lobby, ConnectionId::mint());
        assert!(matches!(
            out[0].message,
            ServerMessage::AssignRole { role: Color::White, .. }
        ));
    }

    #[test]
    fn test_disconnect_of_unbound_connection_does_nothing() {
        let mut lobby = Lobby::default();
        started(&mut lobby);
        assert!(lobby.handle(ConnectionId::mint(), Inbound::Closed).is_empty());
        assert_eq!(lobby.session_count(), 1);
    }

    #[test]
    fn test_survivor_can_join_again_after_disconnect() {
        let mut lobby = Lobby::default();
        let (white, black, _) = started(&mut lobby);
        lobby.handle(white, Inbound::Closed);

        let out = join(&mut lobby, black);

        assert!(matches!(
            out[0].message,
            ServerMessage::AssignRole { role: Color::White, .. }
        ));
    }
}
