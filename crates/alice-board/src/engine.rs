//! The move engine: a pure validator and the mutation that follows it.
//!
//! Validation and application are split on purpose. [`validate`] never
//! touches the position, so a rejected move cannot leave the two players
//! with diverging boards. [`apply`] is only called once validation passed.
//!
//! # Rule sets
//!
//! - [`RuleSet::Basic`] is the compatibility mode and the default. Board
//!   indices are taken verbatim from the client and the only checks are
//!   "every coordinate is on a board" and "the source cell holds a piece".
//!   The piece moves exactly where the client says, overwriting the target.
//! - [`RuleSet::Alice`] enforces the Alice Chess movement rules: the move
//!   must be legal for the piece on its current board, the destination is
//!   the same square on the *other* board, and that transfer square must be
//!   empty. Check, checkmate, castling, en passant and promotion are not
//!   implemented in either mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{BoardPair, Square};
use crate::piece::{Color, Piece, PieceKind};
use crate::IllegalMove;

/// A proposed move, exactly as the client sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Which legality rules the engine enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSet {
    /// Only source-cell presence is checked.
    #[default]
    Basic,
    /// Piece geometry plus the board-transfer rule.
    Alice,
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Alice => write!(f, "alice"),
        }
    }
}

/// Error for an unrecognized rule set name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule set {0:?} (expected \"basic\" or \"alice\")")]
pub struct UnknownRuleSet(pub String);

impl FromStr for RuleSet {
    type Err = UnknownRuleSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "alice" => Ok(Self::Alice),
            _ => Err(UnknownRuleSet(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// validate / apply
// ---------------------------------------------------------------------------

/// Checks whether `mv` may be played by `turn` on `board`.
///
/// Pure: reads the position, never writes it. Turn order (whether the
/// sender is the player on move) is the caller's concern; `turn` is only
/// used by the Alice rules to check piece ownership and pawn direction.
pub fn validate(
    board: &BoardPair,
    turn: Color,
    mv: &Move,
    rules: RuleSet,
) -> Result<(), IllegalMove> {
    if !mv.from.is_valid() || !mv.to.is_valid() {
        return Err(IllegalMove::OutOfBounds);
    }
    let piece = board.piece_at(mv.from).ok_or(IllegalMove::EmptySource)?;

    match rules {
        RuleSet::Basic => Ok(()),
        RuleSet::Alice => validate_alice(board, turn, piece, mv),
    }
}

/// Plays `mv` and passes the turn. Returns the captured piece, if any.
///
/// Must only be called after [`validate`] accepted the same move under the
/// same rule set.
pub fn apply(
    board: &mut BoardPair,
    turn: &mut Color,
    mv: &Move,
    rules: RuleSet,
) -> Option<Piece> {
    let piece = board.take(mv.from);
    let captured = match rules {
        // The target cell is simply overwritten.
        RuleSet::Basic => board.piece_at(mv.to),
        // Captures happen on the board the piece leaves; the transfer
        // square on the other board is known to be empty.
        RuleSet::Alice => board.take(mv.to.mirrored()),
    };
    board.set(mv.to, piece);
    *turn = turn.opposite();
    captured
}

fn validate_alice(
    board: &BoardPair,
    turn: Color,
    piece: Piece,
    mv: &Move,
) -> Result<(), IllegalMove> {
    if piece.color != turn {
        return Err(IllegalMove::NotYourPiece);
    }
    if mv.to.board == mv.from.board {
        return Err(IllegalMove::WrongBoard);
    }
    if mv.from.row == mv.to.row && mv.from.col == mv.to.col {
        return Err(IllegalMove::NoMovement);
    }

    // The move itself is played on the source board.
    let target = mv.to.mirrored();
    let captured = board.piece_at(target);
    if captured.is_some_and(|p| p.color == piece.color) {
        return Err(IllegalMove::OwnPieceAtTarget);
    }
    if board.piece_at(mv.to).is_some() {
        return Err(IllegalMove::TransferSquareOccupied);
    }

    check_geometry(board, piece, mv.from, target, captured.is_some())
}

/// Verifies that `piece` can travel from `from` to `to` on `from.board`.
fn check_geometry(
    board: &BoardPair,
    piece: Piece,
    from: Square,
    to: Square,
    is_capture: bool,
) -> Result<(), IllegalMove> {
    let dr = i16::from(to.row) - i16::from(from.row);
    let dc = i16::from(to.col) - i16::from(from.col);
    let (adr, adc) = (dr.abs(), dc.abs());

    match piece.kind {
        PieceKind::Knight => {
            if (adr, adc) == (1, 2) || (adr, adc) == (2, 1) {
                Ok(())
            } else {
                Err(IllegalMove::IllegalGeometry)
            }
        }
        PieceKind::King => {
            if adr.max(adc) == 1 {
                Ok(())
            } else {
                Err(IllegalMove::IllegalGeometry)
            }
        }
        PieceKind::Rook if dr == 0 || dc == 0 => path_clear(board, from, to),
        PieceKind::Bishop if adr == adc => path_clear(board, from, to),
        PieceKind::Queen if dr == 0 || dc == 0 || adr == adc => {
            path_clear(board, from, to)
        }
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
            Err(IllegalMove::IllegalGeometry)
        }
        PieceKind::Pawn => check_pawn(board, piece.color, from, to, is_capture),
    }
}

fn check_pawn(
    board: &BoardPair,
    color: Color,
    from: Square,
    to: Square,
    is_capture: bool,
) -> Result<(), IllegalMove> {
    let forward = i16::from(color.pawn_direction());
    let dr = i16::from(to.row) - i16::from(from.row);
    let dc = i16::from(to.col) - i16::from(from.col);

    match (dr, dc.abs()) {
        // Diagonal step: only as a capture.
        (d, 1) if d == forward => {
            if is_capture {
                Ok(())
            } else {
                Err(IllegalMove::IllegalGeometry)
            }
        }
        // Straight step: never a capture.
        (d, 0) if d == forward => {
            if is_capture {
                Err(IllegalMove::PathBlocked)
            } else {
                Ok(())
            }
        }
        // Double step from the starting row over an empty square.
        (d, 0) if d == 2 * forward && from.row == color.pawn_start_row() => {
            if is_capture {
                return Err(IllegalMove::PathBlocked);
            }
            path_clear(board, from, to)
        }
        _ => Err(IllegalMove::IllegalGeometry),
    }
}

/// Every square strictly between `from` and `to` (a straight or diagonal
/// line on one board) must be empty.
fn path_clear(
    board: &BoardPair,
    from: Square,
    to: Square,
) -> Result<(), IllegalMove> {
    let step_r = (i16::from(to.row) - i16::from(from.row)).signum();
    let step_c = (i16::from(to.col) - i16::from(from.col)).signum();

    let mut r = i16::from(from.row) + step_r;
    let mut c = i16::from(from.col) + step_c;
    while (r, c) != (i16::from(to.row), i16::from(to.col)) {
        // Both stay within 0..8 because they walk toward an on-board target.
        let square = Square::new(from.board, r as u8, c as u8);
        if board.piece_at(square).is_some() {
            return Err(IllegalMove::PathBlocked);
        }
        r += step_r;
        c += step_c;
    }
    Ok(())
}
