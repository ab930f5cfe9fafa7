//! Move representation.

use crate::Square;
use std::fmt;

/// A move as a bare (from, to) pair.
///
/// Captures, en passant, castling and promotion are not encoded here; the
/// board infers them from what stands on the squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    from: Square,
    to: Square,
}

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// A null move (used as placeholder, not a legal move).
    pub const NULL: Move = Move::new(Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}-{})", self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// The two directions a King can castle in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Towards the h-file (0-0).
    Kingside,
    /// Towards the a-file (0-0-0).
    Queenside,
}

impl CastleSide {
    /// Returns the file step the King takes (+1 kingside, -1 queenside).
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }

    /// Returns the file index of the castling Rook's home square.
    #[inline]
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Classifies a King move by its file delta, if it is a castling move.
    pub const fn from_king_move(from: Square, to: Square) -> Option<Self> {
        if from.rank_index() != to.rank_index() {
            return None;
        }
        match to.file_index() as i8 - from.file_index() as i8 {
            2 => Some(CastleSide::Kingside),
            -2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    /// Returns the notation string ("0-0" or "0-0-0").
    pub const fn notation(self) -> &'static str {
        match self {
            CastleSide::Kingside => "0-0",
            CastleSide::Queenside => "0-0-0",
        }
    }
}
