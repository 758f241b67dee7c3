//! A single game between two connections.

use alice_board::{apply, validate, BoardPair, Color, IllegalMove, Move, Piece, RuleSet};
use alice_protocol::SessionId;
use alice_transport::ConnectionId;

use crate::{SessionError, SessionState};

/// Per-connection record: which session a connection plays in, and as
/// which color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantBinding {
    pub session_id: SessionId,
    pub role: Color,
}

/// One match: up to two seated players, their shared board pair, and
/// whose turn it is.
///
/// White is always the creator; black is the second joiner. The board
/// pair is owned here and only changed through [`Session::play`].
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    white: ConnectionId,
    black: Option<ConnectionId>,
    board: BoardPair,
    turn: Color,
    state: SessionState,
    moves_played: u32,
}

impl Session {
    /// A waiting session with `white` seated and the opening position.
    pub(crate) fn new(id: SessionId, white: ConnectionId) -> Self {
        Self {
            id,
            white,
            black: None,
            board: BoardPair::initial(),
            turn: Color::White,
            state: SessionState::Waiting,
            moves_played: 0,
        }
    }

    /// Seats `conn` as black and activates the session.
    pub(crate) fn seat_black(&mut self, conn: ConnectionId) -> Result<(), SessionError> {
        if self.is_full() || !self.state.is_joinable() {
            return Err(SessionError::SessionFull(self.id));
        }
        self.black = Some(conn);
        self.transition(SessionState::Active);
        Ok(())
    }

    pub(crate) fn terminate(&mut self) {
        self.transition(SessionState::Terminated);
    }

    fn transition(&mut self, target: SessionState) {
        debug_assert!(
            self.state.can_transition_to(target),
            "invalid session transition {} -> {target}",
            self.state
        );
        self.state = target;
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn white(&self) -> ConnectionId {
        self.white
    }

    pub fn black(&self) -> Option<ConnectionId> {
        self.black
    }

    pub fn board(&self) -> &BoardPair {
        &self.board
    }

    /// The color on move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of moves applied so far.
    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    /// Returns `true` once both seats are taken.
    pub fn is_full(&self) -> bool {
        self.black.is_some()
    }

    /// Seated connections, white first.
    pub fn participants(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        std::iter::once(self.white).chain(self.black)
    }

    /// The color `conn` plays in this session, if seated.
    pub fn role_of(&self, conn: ConnectionId) -> Option<Color> {
        if conn == self.white {
            Some(Color::White)
        } else if self.black == Some(conn) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The other seated player, if any.
    pub fn opponent_of(&self, conn: ConnectionId) -> Option<ConnectionId> {
        self.participants().find(|p| *p != conn)
    }

    /// Validates `mv` for the side on move and, if legal, applies it.
    ///
    /// Turn order is the caller's concern: whoever calls this has already
    /// checked that the sender plays [`Session::turn`]. A rejected move
    /// leaves the session untouched.
    pub fn play(&mut self, mv: &Move, rules: RuleSet) -> Result<Option<Piece>, IllegalMove> {
        validate(&self.board, self.turn, mv, rules)?;
        let captured = apply(&mut self.board, &mut self.turn, mv, rules);
        self.moves_played += 1;
        Ok(captured)
    }
}
