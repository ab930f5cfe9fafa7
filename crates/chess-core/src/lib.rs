//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine
//! and its front ends:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`] and [`CastleSide`] for move representation
//! - [`Notation`] for recording and replaying move history

mod color;
mod mov;
mod notation;
mod piece;
mod square;

pub use color::Color;
pub use mov::{CastleSide, Move};
pub use notation::{Notation, NotationError};
pub use piece::{Piece, PieceKind, Promotion};
pub use square::Square;
