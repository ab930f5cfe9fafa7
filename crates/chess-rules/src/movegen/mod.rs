//! Move generation.
//!
//! [`legal_moves_for`] makes one pass over the board: every piece of both
//! colors contributes to the attacked-square sets, and the mover's pieces
//! have their pseudo-legal moves filtered through the check simulation.
//! Castling safety, check detection and checkmate/stalemate classification
//! all read the same attacked-square data.

mod pieces;
pub mod perft;

use crate::{Board, SquareSet};
use chess_core::{Color, Move, Square};

pub(crate) use pieces::moves_with_attacks;
pub use pieces::{attacked_squares, can_castle, pseudo_legal_moves};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Squares attacked by each color, for one fixed position.
///
/// A cache: it describes the board it was computed from and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackedSquares {
    by_color: [SquareSet; 2],
}

impl AttackedSquares {
    /// Returns the squares attacked by the given color.
    #[inline]
    pub fn by(&self, color: Color) -> SquareSet {
        self.by_color[color.index()]
    }
}

/// The legal moves for one side, with the attacked squares computed in the
/// same pass.
#[derive(Debug, Clone)]
pub struct LegalMoveSet {
    side: Color,
    moves: MoveList,
    attacked: AttackedSquares,
}

impl LegalMoveSet {
    /// Returns the side these moves are for.
    pub fn side(&self) -> Color {
        self.side
    }

    /// Returns the legal moves.
    pub fn moves(&self) -> &[Move] {
        self.moves.as_slice()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns true if the move is legal.
    pub fn contains(&self, m: Move) -> bool {
        self.moves().contains(&m)
    }

    /// Returns the legal destinations of the piece on `from`.
    pub fn destinations(&self, from: Square) -> SquareSet {
        self.moves()
            .iter()
            .filter(|m| m.from() == from)
            .map(|m| m.to())
            .collect()
    }

    /// Returns the attacked-square sets for both colors.
    pub fn attacked(&self) -> &AttackedSquares {
        &self.attacked
    }
}

/// Generates the legal moves for `color` and the attacked squares of both
/// colors.
///
/// Needs `&mut` because every candidate is tried on the board itself; the
/// board is back in its original state when this returns.
pub fn legal_moves_for(board: &mut Board, color: Color) -> LegalMoveSet {
    let mut attacked = AttackedSquares::default();
    let mut origins = SquareSet::EMPTY;

    for (sq, piece) in board.pieces() {
        attacked.by_color[piece.color.index()] |= attacked_squares(board, sq);
        if piece.color == color {
            origins.insert(sq);
        }
    }

    let enemy_attacks = attacked.by(color.opposite());
    let mut moves = MoveList::new();
    for from in origins {
        for to in moves_with_attacks(board, from, Some(enemy_attacks)) {
            if !board.would_cause_check(from, to, color) {
                moves.push(Move::new(from, to));
            }
        }
    }

    LegalMoveSet {
        side: color,
        moves,
        attacked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Piece, PieceKind};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn movelist_push_and_iterate() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let m1 = Move::new(sq("e2"), sq("e4"));
        let m2 = Move::new(sq("d2"), sq("d4"));
        list.push(m1);
        list.push(m2);

        assert_eq!(list.len(), 2);
        assert_eq!(list.as_slice(), &[m1, m2]);
        assert_eq!((&list).into_iter().count(), 2);
    }

    #[test]
    fn standard_setup_has_twenty_moves() {
        let mut board = Board::standard();
        let legal = legal_moves_for(&mut board, Color::White);
        assert_eq!(legal.len(), 20);
        assert_eq!(legal.side(), Color::White);
        assert!(legal.contains(Move::new(sq("e2"), sq("e4"))));
        assert!(legal.contains(Move::new(Square::G1, sq("f3"))));
        assert!(!legal.contains(Move::new(Square::E1, sq("e2"))));
        assert_eq!(legal.destinations(sq("b1")).len(), 2);
    }

    #[test]
    fn attacked_squares_cover_both_colors() {
        let mut board = Board::standard();
        let legal = legal_moves_for(&mut board, Color::White);
        let white = legal.attacked().by(Color::White);
        let black = legal.attacked().by(Color::Black);

        assert!(white.contains(sq("e3")));
        assert!(white.contains(sq("f3")));
        assert!(!white.contains(sq("e4")));
        assert!(black.contains(sq("d6")));
        assert!(!black.contains(sq("d5")));
    }

    #[test]
    fn generation_leaves_board_unchanged() {
        let mut board = Board::standard();
        let before = board.clone();
        legal_moves_for(&mut board, Color::Black);
        assert_eq!(board, before);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let mut board = Board::empty();
        board.put(Square::E1, Piece::new(PieceKind::King, Color::White).moved());
        board.put(sq("e3"), Piece::new(PieceKind::Knight, Color::White));
        board.put(Square::E8, Piece::new(PieceKind::Rook, Color::Black));
        board.put(Square::A8, Piece::new(PieceKind::King, Color::Black).moved());

        let legal = legal_moves_for(&mut board, Color::White);
        assert!(legal.destinations(sq("e3")).is_empty());
        // The knight still shields the King.
        assert!(legal.contains(Move::new(Square::E1, sq("e2"))));
        assert_eq!(legal.len(), 5);
    }

    #[test]
    fn king_cannot_capture_a_defended_piece() {
        let mut board = Board::empty();
        board.put(Square::E1, Piece::new(PieceKind::King, Color::White).moved());
        board.put(sq("e2"), Piece::new(PieceKind::Queen, Color::Black));
        board.put(sq("e5"), Piece::new(PieceKind::Rook, Color::Black));
        board.put(Square::A8, Piece::new(PieceKind::King, Color::Black).moved());

        let legal = legal_moves_for(&mut board, Color::White);
        assert!(!legal.contains(Move::new(Square::E1, sq("e2"))));
        assert!(legal.is_empty());
    }
}
