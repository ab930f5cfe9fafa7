//! Chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - the 8x8 grid, en passant target, and move application
//! - [`GameState`] - turn order, move history, and checkmate/stalemate detection
//! - [`SquareSet`] - a 64-bit set of squares for attack and move data
//! - [`PromotionChooser`] - the hook a front end uses to pick promotion pieces
//! - Legal move generation and perft counting
//!
//! # Architecture
//!
//! Pieces live in a mailbox array; each piece carries its own "has moved"
//! flag, which drives pawn double steps and castling eligibility. Legal moves
//! are found by generating pseudo-legal moves and trying each one on the
//! board, restoring the touched squares afterwards.
//!
//! # Example
//!
//! ```
//! use chess_core::{Color, Square};
//! use chess_rules::{GameState, GameStatus};
//!
//! let mut game = GameState::new();
//! println!("Legal moves from starting position: {}", game.legal_moves().len());
//!
//! let sq = |s| Square::from_algebraic(s).unwrap();
//! game.play(sq("f2"), sq("f3")).unwrap();
//! game.play(sq("e7"), sq("e5")).unwrap();
//! game.play(sq("g2"), sq("g4")).unwrap();
//! let status = game.play(sq("d8"), sq("h4")).unwrap();
//! assert_eq!(status, GameStatus::Checkmate { winner: Color::Black });
//! ```

mod board;
mod game;
pub mod movegen;
mod promotion;
mod square_set;

pub use board::{AppliedMove, Board, BoardError};
pub use game::{GameState, GameStatus, MoveError, ReplayError, ReplayFault};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    attacked_squares, can_castle, legal_moves_for, pseudo_legal_moves, AttackedSquares,
    LegalMoveSet, MoveList,
};
pub use promotion::{DefaultPromotion, FixedPromotion, PromotionChooser};
pub use square_set::SquareSet;
