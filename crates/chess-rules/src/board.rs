//! Board state and move application.

use crate::movegen::attacked_squares;
use crate::{PromotionChooser, SquareSet};
use chess_core::{CastleSide, Color, Notation, Piece, PieceKind, Promotion, Square};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised by [`Board::apply`].
///
/// `apply` does not re-validate legality; the only thing it checks is that
/// there is something to move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("no piece at {0}")]
    NoPieceAt(Square),
}

/// What a call to [`Board::apply`] did, resolved from the board contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    /// The piece as it stood on `from` before moving.
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    /// The captured piece, including a pawn taken en passant.
    pub captured: Option<Piece>,
    pub en_passant: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<Promotion>,
}

impl AppliedMove {
    /// Returns the history notation for this move.
    pub fn notation(&self) -> Notation {
        match self.castle {
            Some(side) => Notation::Castle(side),
            None => Notation::Move {
                piece: self.piece.kind,
                from: self.from,
                to: self.to,
                promotion: self.promotion,
            },
        }
    }
}

/// The 8x8 grid plus the en passant target.
///
/// "Has moved" flags live on the pieces themselves.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
    en_passant_target: Option<Square>,
}

/// Back rank layout, a-file to h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            en_passant_target: None,
        }
    }

    /// Creates the standard starting position.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for color in Color::ALL {
            let back = color.back_rank();
            let pawns = (back as i8 + color.pawn_direction()) as u8;
            for file in 0..8u8 {
                if let Some(sq) = Square::from_coords(back, file) {
                    board.put(sq, Piece::new(BACK_RANK[file as usize], color));
                }
                if let Some(sq) = Square::from_coords(pawns, file) {
                    board.put(sq, Piece::new(PieceKind::Pawn, color));
                }
            }
        }
        board
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize]
    }

    /// Returns true if nothing stands on the given square.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Places a piece, returning whatever stood there before.
    pub fn put(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.squares[sq.index() as usize].replace(piece)
    }

    /// Removes and returns the piece on the given square.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize].take()
    }

    #[inline]
    fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index() as usize] = piece;
    }

    /// Returns the square a pawn could capture onto en passant.
    ///
    /// Only valid for the ply right after a double step.
    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Sets the en passant target. Intended for building positions.
    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        self.en_passant_target = target;
    }

    /// Iterates over occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Returns the set of squares occupied by the given color.
    pub fn occupied_by(&self, color: Color) -> SquareSet {
        self.pieces()
            .filter(|(_, piece)| piece.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Returns the square of the given color's King.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
            .map(|(sq, _)| sq)
    }

    /// Returns the square of the pawn a `color` pawn would capture by moving
    /// to `to` en passant, or `None` if `to` is not an en passant capture.
    pub fn en_passant_victim(&self, color: Color, to: Square) -> Option<Square> {
        if self.en_passant_target != Some(to) {
            return None;
        }
        let victim = to.offset(-color.pawn_direction(), 0)?;
        match self.piece_at(victim) {
            Some(piece) if piece.kind == PieceKind::Pawn && piece.color != color => Some(victim),
            _ => None,
        }
    }

    /// Returns true if any piece of `by` attacks `target`.
    ///
    /// Scans the whole board; the attacked-square caches built by
    /// [`legal_moves_for`](crate::legal_moves_for) answer the same question
    /// for a fixed position without rescanning.
    pub fn is_attacked_by(&self, target: Square, by: Color) -> bool {
        self.pieces()
            .filter(|(_, piece)| piece.color == by)
            .any(|(sq, _)| attacked_squares(self, sq).contains(target))
    }

    /// Returns true if the given color's King is attacked.
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked_by(king, color.opposite()))
    }

    /// Returns true if moving `from` -> `to` would leave `color`'s King
    /// attacked.
    ///
    /// The move is made on this board, the enemy attacks are rescanned, and
    /// the touched squares are restored before returning, whatever the
    /// outcome.
    pub fn would_cause_check(&mut self, from: Square, to: Square, color: Color) -> bool {
        self.with_trial_move(from, to, |board| board.in_check(color))
    }

    /// Makes a temporary move, hands the resulting board to `inspect`, then
    /// restores every touched square.
    ///
    /// Only the grid is touched: the en passant target and "has moved" flags
    /// are left alone, and a castling Rook is not relocated.
    fn with_trial_move<R>(
        &mut self,
        from: Square,
        to: Square,
        inspect: impl FnOnce(&Board) -> R,
    ) -> R {
        let mut snapshot = Snapshot::default();
        snapshot.record(self, from);
        snapshot.record(self, to);

        let moving = self.piece_at(from);
        if let Some(piece) = moving {
            if piece.kind == PieceKind::Pawn {
                if let Some(victim) = self.en_passant_victim(piece.color, to) {
                    snapshot.record(self, victim);
                    self.set(victim, None);
                }
            }
        }
        self.set(from, None);
        self.set(to, moving);

        let result = inspect(self);
        snapshot.restore(self);
        result
    }

    /// Applies a move and resolves its side effects.
    ///
    /// The caller must have checked that the move is legal; only the presence
    /// of a piece on `from` is verified. In order:
    /// 1. an en passant capture removes the pawn behind `to`,
    /// 2. the piece moves and `from` is cleared,
    /// 3. the en passant target is reset, then set again after a double step,
    /// 4. a pawn reaching the far rank is promoted via `chooser`,
    /// 5. a King moving two files brings its Rook across,
    /// 6. the moved piece is flagged as moved.
    pub fn apply<P>(
        &mut self,
        from: Square,
        to: Square,
        chooser: &mut P,
    ) -> Result<AppliedMove, BoardError>
    where
        P: PromotionChooser + ?Sized,
    {
        let piece = self.piece_at(from).ok_or(BoardError::NoPieceAt(from))?;
        let mut captured = self.piece_at(to);
        let mut en_passant = false;

        if piece.kind == PieceKind::Pawn {
            if let Some(victim) = self.en_passant_victim(piece.color, to) {
                captured = self.take(victim);
                en_passant = true;
                trace!(%victim, "en passant capture");
            }
        }

        self.set(to, Some(piece));
        self.set(from, None);

        self.en_passant_target = None;
        if piece.kind == PieceKind::Pawn && from.rank_index().abs_diff(to.rank_index()) == 2 {
            self.en_passant_target = from.offset(piece.color.pawn_direction(), 0);
        }

        let mut promotion = None;
        if piece.kind == PieceKind::Pawn && to.rank_index() == piece.color.promotion_rank() {
            let choice = chooser.choose_promotion(piece.color);
            self.set(to, Some(Piece::new(choice.kind(), piece.color)));
            promotion = Some(choice);
            debug!(%to, piece = %choice.kind(), "pawn promoted");
        }

        let castle = if piece.kind == PieceKind::King {
            CastleSide::from_king_move(from, to)
        } else {
            None
        };
        if let Some(side) = castle {
            self.relocate_castling_rook(to, side);
        }

        if let Some(moved) = self.squares[to.index() as usize].as_mut() {
            moved.has_moved = true;
        }

        Ok(AppliedMove {
            piece,
            from,
            to,
            captured,
            en_passant,
            castle,
            promotion,
        })
    }

    /// Moves the castling Rook to the square the King passed over.
    fn relocate_castling_rook(&mut self, king_to: Square, side: CastleSide) {
        let rook_from = Square::from_coords(king_to.rank_index(), side.rook_file());
        let rook_to = king_to.offset(0, -side.direction());
        if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
            if let Some(rook) = self.take(rook_from) {
                self.put(rook_to, rook.moved());
                debug!(%rook_from, %rook_to, ?side, "castling rook relocated");
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(en_passant: {:?})", self.en_passant_target)?;
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match Square::from_coords(rank, file).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => write!(f, "{} ", piece.glyph())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Squares saved before a trial move. A trial move touches at most three:
/// origin, destination, and an en passant victim.
#[derive(Default)]
struct Snapshot {
    saved: [Option<(Square, Option<Piece>)>; 3],
    len: usize,
}

impl Snapshot {
    fn record(&mut self, board: &Board, sq: Square) {
        debug_assert!(self.len < self.saved.len());
        self.saved[self.len] = Some((sq, board.piece_at(sq)));
        self.len += 1;
    }

    fn restore(self, board: &mut Board) {
        for (sq, piece) in self.saved[..self.len].iter().rev().flatten() {
            board.set(*sq, *piece);
        }
    }
}
