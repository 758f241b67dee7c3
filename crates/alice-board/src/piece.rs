//! Pieces and colors.
//!
//! A piece has no identity beyond its kind and color: two white pawns are
//! indistinguishable, and boards store pieces by value. On the wire each
//! piece is a single Unicode chess glyph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Side color. Also used as the participant role: the first participant in
/// a session plays white, the second plays black.
///
/// `#[serde(rename_all = "lowercase")]` gives `"white"` / `"black"` on the
/// wire, which is what `assignRole` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the other color.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta of a pawn step for this color. White starts on rows 6-7
    /// and moves toward row 0.
    pub(crate) const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row a pawn of this color starts on (where a double step is allowed).
    pub(crate) const fn pawn_start_row(self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind / Piece
// ---------------------------------------------------------------------------

/// The six chess piece types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

/// One of the twelve chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

/// Every piece, white first. Glyph lookup goes through [`Piece::symbol`].
const ALL_PIECES: [Piece; 12] = {
    use PieceKind::{Bishop, King, Knight, Pawn, Queen, Rook};
    const KINDS: [PieceKind; 6] = [King, Queen, Rook, Bishop, Knight, Pawn];
    let mut all = [Piece::new(Color::White, King); 12];
    let mut i = 0;
    while i < 6 {
        all[i] = Piece::new(Color::White, KINDS[i]);
        all[i + 6] = Piece::new(Color::Black, KINDS[i]);
        i += 1;
    }
    all
};

impl Piece {
    /// Creates a piece.
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// The Unicode glyph used for this piece on the wire.
    pub const fn symbol(self) -> char {
        use Color::{Black, White};
        use PieceKind::*;
        match (self.color, self.kind) {
            (White, King) => '♔',
            (White, Queen) => '♕',
            (White, Rook) => '♖',
            (White, Bishop) => '♗',
            (White, Knight) => '♘',
            (White, Pawn) => '♙',
            (Black, King) => '♚',
            (Black, Queen) => '♛',
            (Black, Rook) => '♜',
            (Black, Bishop) => '♝',
            (Black, Knight) => '♞',
            (Black, Pawn) => '♟',
        }
    }

    /// Looks a piece up by its glyph.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        ALL_PIECES.into_iter().find(|p| p.symbol() == symbol)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error returned when a string is not exactly one known piece glyph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown piece symbol {0:?}")]
pub struct UnknownSymbol(pub String);

impl FromStr for Piece {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_symbol(c).ok_or_else(|| UnknownSymbol(s.to_string()))
            }
            _ => Err(UnknownSymbol(s.to_string())),
        }
    }
}
