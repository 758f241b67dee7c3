//! Board state and move engine for Alice Chess.
//!
//! # Key types
//!
//! - [`Piece`], [`Color`], [`PieceKind`] — what sits on a square
//! - [`Board`], [`BoardPair`], [`Square`] — the two 8×8 grids of a game
//! - [`Move`], [`RuleSet`] — a proposed move and the rules it is checked against
//! - [`validate`] / [`apply`] — the pure legality check and the mutation
//!
//! This crate knows nothing about connections or sessions. It is the
//! position and the rules, nothing else.

mod board;
mod engine;
mod error;
mod piece;

pub use board::{Board, BoardPair, Square, BOARD_COUNT, BOARD_SIZE};
pub use engine::{apply, validate, Move, RuleSet, UnknownRuleSet};
pub use error::IllegalMove;
pub use piece::{Color, Piece, PieceKind, UnknownSymbol};
