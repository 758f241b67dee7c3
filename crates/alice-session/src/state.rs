//! Session lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lifecycle state of a session.
///
/// Transitions are strictly ordered, no skipping states:
///
/// ```text
/// Waiting → Active → Terminated
/// ```
///
/// - **Waiting**: one player (white) is seated. No moves accepted; the
///   next joiner takes the black seat.
/// - **Active**: both players are seated. Moves are accepted, alternating,
///   white first.
/// - **Terminated**: a player's channel closed. Nothing is valid any more
///   and the session is removed from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Waiting,
    Active,
    Terminated,
}

impl SessionState {
    /// Returns `true` if the session can take another player.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if moves may be played.
    pub fn accepts_moves(self) -> bool {
        matches!(self, Self::Active)
    }

    /// The state that follows this one, or `None` from `Terminated`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Active),
            Self::Active => Some(Self::Terminated),
            Self::Terminated => None,
        }
    }

    /// Returns `true` if moving to `target` is a valid transition.
    ///
    /// `Waiting → Terminated` is also allowed: a lone waiting player can
    /// disconnect before anyone joins.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target) || (self == Self::Waiting && target == Self::Terminated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}
