//! The dual-board data model.
//!
//! Alice Chess is played on two ordinary 8×8 boards at once. A game's
//! complete position is a [`BoardPair`]: board 0 starts with the standard
//! arrangement and board 1 starts empty.
//!
//! Coordinates come straight from clients, so nothing here indexes with an
//! unchecked [`Square`]. Out-of-range squares read as empty and writes to
//! them are ignored; the move engine rejects them before any write.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece, PieceKind, UnknownSymbol};

/// Number of rows and columns on each board.
pub const BOARD_SIZE: u8 = 8;

/// Number of boards in a [`BoardPair`].
pub const BOARD_COUNT: u8 = 2;

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A cell address: which board, which row, which column.
///
/// Serializes as `{ "board": 0, "row": 6, "col": 4 }`, the shape clients
/// use in `move` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub board: u8,
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(board: u8, row: u8, col: u8) -> Self {
        Self { board, row, col }
    }

    /// Returns `true` if every component addresses a real cell.
    pub const fn is_valid(self) -> bool {
        self.board < BOARD_COUNT && self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The same row/column on the other board.
    pub const fn mirrored(self) -> Self {
        Self {
            board: 1 - (self.board % BOARD_COUNT),
            row: self.row,
            col: self.col,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}:r{}c{}", self.board, self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The JSON form of a board: rows of glyph strings, `""` for empty.
type WireBoard = [[String; 8]; 8];

/// A single 8×8 grid.
///
/// On the wire a board is an 8×8 array of strings, each either a single
/// piece glyph or `""`. `try_from`/`into` let serde go through that form
/// while the Rust side keeps `Option<Piece>` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireBoard", into = "WireBoard")]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    /// The standard chess starting arrangement. Black occupies rows 0-1,
    /// white rows 6-7.
    pub fn standard() -> Self {
        use PieceKind::{Bishop, King, Knight, Pawn, Queen, Rook};
        const BACK_RANK: [PieceKind; 8] =
            [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            board.cells[0][col] = Some(Piece::new(Color::Black, *kind));
            board.cells[1][col] = Some(Piece::new(Color::Black, Pawn));
            board.cells[6][col] = Some(Piece::new(Color::White, Pawn));
            board.cells[7][col] = Some(Piece::new(Color::White, *kind));
        }
        board
    }

    /// The piece at `(row, col)`, or `None` if empty or off the board.
    pub fn get(&self, row: u8, col: u8) -> Option<Piece> {
        self.cells
            .get(usize::from(row))
            .and_then(|r| r.get(usize::from(col)))
            .copied()
            .flatten()
    }

    /// Replaces the content of `(row, col)`. Off-board writes are ignored.
    pub fn set(&mut self, row: u8, col: u8, piece: Option<Piece>) {
        if let Some(cell) = self
            .cells
            .get_mut(usize::from(row))
            .and_then(|r| r.get_mut(usize::from(col)))
        {
            *cell = piece;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Board> for WireBoard {
    fn from(board: Board) -> Self {
        board.cells.map(|row| {
            row.map(|cell| cell.map(|p| p.symbol().to_string()).unwrap_or_default())
        })
    }
}

impl TryFrom<WireBoard> for Board {
    type Error = UnknownSymbol;

    fn try_from(wire: WireBoard) -> Result<Self, Self::Error> {
        let mut board = Self::empty();
        for (r, row) in wire.iter().enumerate() {
            for (c, symbol) in row.iter().enumerate() {
                if !symbol.is_empty() {
                    board.cells[r][c] = Some(symbol.parse()?);
                }
            }
        }
        Ok(board)
    }
}

// ---------------------------------------------------------------------------
// BoardPair
// ---------------------------------------------------------------------------

/// The two boards of one game, serialized as `[Board, Board]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardPair([Board; 2]);

impl BoardPair {
    /// The opening position: standard setup on board 0, board 1 empty.
    pub fn initial() -> Self {
        Self([Board::standard(), Board::empty()])
    }

    /// Borrows one board. `None` for an index other than 0 or 1.
    pub fn board(&self, index: u8) -> Option<&Board> {
        self.0.get(usize::from(index))
    }

    /// The piece at `square`, or `None` if empty or off the boards.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board(square.board)
            .and_then(|b| b.get(square.row, square.col))
    }

    /// Replaces the content of `square`. Off-board writes are ignored.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(board) = self.0.get_mut(usize::from(square.board)) {
            board.set(square.row, square.col, piece);
        }
    }

    /// Removes and returns the piece at `square`.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square);
        self.set(square, None);
        piece
    }
}

impl Default for BoardPair {
    fn default() -> Self {
        Self::initial()
    }
}
