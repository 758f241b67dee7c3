//! Session management for Alice Chess.
//!
//! A session is one game between two connections. This crate owns every
//! session and every connection-to-session binding; nothing outside the
//! registry changes who plays in which game.
//!
//! # Key types
//!
//! - [`SessionRegistry`] — owns sessions, bindings and the waiting queue
//! - [`Matchmaker`] — pairs a joiner with the oldest waiting session
//! - [`Session`] — players, board pair, turn, lifecycle state
//! - [`SessionState`] — `Waiting → Active → Terminated`
//! - [`ParticipantBinding`] — which session and color a connection has

mod error;
mod matchmaker;
mod registry;
mod session;
mod state;

pub use error::SessionError;
pub use matchmaker::{Matchmaker, Pairing};
pub use registry::SessionRegistry;
pub use session::{ParticipantBinding, Session};
pub use state::SessionState;
