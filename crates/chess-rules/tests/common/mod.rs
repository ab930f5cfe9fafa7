//! Shared helpers for building test positions.

#![allow(dead_code)]

use chess_core::{Color, Piece, PieceKind, Square};
use chess_rules::Board;

pub fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

/// Builds a board from a piece placement string, rank 8 first.
///
/// Uppercase letters are White, lowercase Black, digits count empty squares.
/// Pawns off their starting rank, and Kings and Rooks off their home
/// squares, are marked as moved; everything else keeps castling rights.
pub fn board_from_placement(placement: &str) -> Board {
    let mut board = Board::empty();
    let ranks: Vec<&str> = placement.split('/').collect();
    assert_eq!(ranks.len(), 8, "placement needs eight ranks: {placement}");

    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                continue;
            }
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let kind = match c.to_ascii_lowercase() {
                'p' => PieceKind::Pawn,
                'n' => PieceKind::Knight,
                'b' => PieceKind::Bishop,
                'r' => PieceKind::Rook,
                'q' => PieceKind::Queen,
                'k' => PieceKind::King,
                other => panic!("unknown piece letter {other:?}"),
            };
            let square = Square::from_coords(rank, file).unwrap();
            let mut piece = Piece::new(kind, color);
            if !at_home(kind, color, square) {
                piece = piece.moved();
            }
            board.put(square, piece);
            file += 1;
        }
        assert_eq!(file, 8, "rank {} is not eight squares wide", rank + 1);
    }
    board
}

fn at_home(kind: PieceKind, color: Color, square: Square) -> bool {
    let back = color.back_rank();
    match kind {
        PieceKind::Pawn => square.rank_index() as i8 == back as i8 + color.pawn_direction(),
        PieceKind::King => square.rank_index() == back && square.file_index() == 4,
        PieceKind::Rook => {
            square.rank_index() == back && (square.file_index() == 0 || square.file_index() == 7)
        }
        _ => true,
    }
}
